use crate::analysis::{Candidate, CandidateKind, Decision, Span};
use crate::discovery::{Corpus, InclusionRules};
use crate::error::Result;
use crate::parser::xml::{text_content, EntryType};
use crate::refactor::MutationEngine;
use crate::resources::ResourceSet;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// `<string>` and `<plurals>` entries of the base string table.
///
/// Removal filters every language table down to the base keys that are still
/// used, so translations lose unused keys along with the base.
pub struct StringKind {
    resources: ResourceSet,
    usage_exclude: Vec<String>,
}

impl StringKind {
    pub fn new(resources: ResourceSet, usage_exclude: Vec<String>) -> Self {
        Self {
            resources,
            usage_exclude,
        }
    }

    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }
}

impl CandidateKind for StringKind {
    fn name(&self) -> &'static str {
        "strings"
    }

    fn inclusion(&self) -> InclusionRules {
        InclusionRules::sources_and_markup()
            .with_tests_included()
            .with_build_excluded()
            .with_excluded_fragments(self.usage_exclude.clone())
    }

    fn extract(&self, _corpus: &Corpus) -> Result<Vec<Candidate>> {
        let base = &self.resources.base;

        Ok(base
            .resources
            .entries
            .iter()
            .filter(|entry| !entry.key.is_empty())
            .map(|entry| Candidate::String {
                key: entry.key.clone(),
                entry_type: entry.entry_type,
                declaring_file: base.path.clone(),
                content: match entry.entry_type {
                    EntryType::String => entry.text(),
                    EntryType::Plurals => entry
                        .items
                        .iter()
                        .map(|item| format!("{}: {}", item.quantity, text_content(&item.raw)))
                        .collect::<Vec<_>>()
                        .join(", "),
                },
            })
            .collect())
    }

    fn usage_pattern(&self, candidate: &Candidate) -> Result<Regex> {
        Ok(Regex::new(&format!(
            r"(?:R\.string\.|@string/|R\.plurals\.|@plurals/){}\b",
            regex::escape(candidate.name())
        ))?)
    }

    fn span(&self, _candidate: &Candidate) -> Span {
        Span::TableEntry
    }

    fn commit(&self, unused: &[&Decision], _corpus: &Corpus, engine: &mut MutationEngine) -> Result<usize> {
        let unused_keys: HashSet<&str> = unused.iter().map(|d| d.candidate.name()).collect();
        let used_keys: HashSet<&str> = self
            .resources
            .base
            .resources
            .keys()
            .filter(|key| !unused_keys.contains(key))
            .collect();

        for table in self.resources.tables() {
            let mut cleaned = table.resources.clone();
            cleaned.entries.retain(|entry| used_keys.contains(entry.key.as_str()));

            if cleaned.entries.len() == table.resources.entries.len() {
                debug!("{} has no unused keys", table.language);
                continue;
            }
            engine.rewrite(&table.path, &cleaned.render())?;
        }

        Ok(unused.len())
    }
}
