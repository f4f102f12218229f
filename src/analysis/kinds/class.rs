use crate::analysis::{Candidate, CandidateKind, Span};
use crate::discovery::{Corpus, FileKind, InclusionRules};
use crate::error::Result;
use regex::Regex;

/// Classes named by convention: one per source file whose stem ends in a
/// known suffix (`Activity`, `Fragment`, `Adapter`, ...)
pub struct ClassKind {
    suffixes: Vec<String>,
}

impl ClassKind {
    pub fn new(suffixes: Vec<String>) -> Self {
        Self { suffixes }
    }
}

impl CandidateKind for ClassKind {
    fn name(&self) -> &'static str {
        "classes"
    }

    fn inclusion(&self) -> InclusionRules {
        InclusionRules::sources_and_markup()
    }

    fn extract(&self, corpus: &Corpus) -> Result<Vec<Candidate>> {
        Ok(corpus
            .files()
            .filter(|file| file.kind == FileKind::Source)
            .filter(|file| {
                let stem = file.stem();
                !stem.is_empty() && self.suffixes.iter().any(|s| stem.ends_with(s.as_str()))
            })
            .map(|file| Candidate::Class {
                name: file.stem().to_string(),
                declaring_file: file.path.clone(),
            })
            .collect())
    }

    fn usage_pattern(&self, candidate: &Candidate) -> Result<Regex> {
        Ok(Regex::new(&format!(r"\b{}\b", regex::escape(candidate.name())))?)
    }

    fn span(&self, _candidate: &Candidate) -> Span {
        Span::WholeFile
    }
}
