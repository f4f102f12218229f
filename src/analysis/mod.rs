//! Usage analysis
//!
//! Each artifact kind (classes, functions, layouts, strings) implements
//! `CandidateKind`. The `Sweeper` drives any kind through the same pass:
//! extract candidates from a corpus snapshot, ask the `UsageOracle` for a
//! verdict on each, then commit the removals of the unused ones.

mod engine;
pub mod kinds;
mod oracle;

pub use engine::Sweeper;
pub use kinds::{ClassKind, FunctionKind, LayoutKind, StringKind};
pub use oracle::UsageOracle;

use crate::discovery::{Corpus, InclusionRules};
use crate::error::Result;
use crate::parser::xml::EntryType;
use crate::refactor::MutationEngine;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A symbol that might be unused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Candidate {
    Class {
        name: String,
        declaring_file: PathBuf,
    },
    Function {
        name: String,
        declaring_file: PathBuf,
        /// 1-based, inclusive
        start_line: usize,
        /// 1-based, inclusive
        end_line: usize,
    },
    Layout {
        name: String,
        declaring_file: PathBuf,
    },
    String {
        key: String,
        entry_type: EntryType,
        declaring_file: PathBuf,
        content: String,
    },
}

impl Candidate {
    /// The symbol searched for in the corpus
    pub fn name(&self) -> &str {
        match self {
            Candidate::Class { name, .. }
            | Candidate::Function { name, .. }
            | Candidate::Layout { name, .. } => name,
            Candidate::String { key, .. } => key,
        }
    }

    pub fn declaring_file(&self) -> &Path {
        match self {
            Candidate::Class { declaring_file, .. }
            | Candidate::Function { declaring_file, .. }
            | Candidate::Layout { declaring_file, .. }
            | Candidate::String { declaring_file, .. } => declaring_file,
        }
    }

    /// Human-readable line used in progress output and reports
    pub fn label(&self) -> String {
        let file_name = self
            .declaring_file()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match self {
            Candidate::Class { .. } | Candidate::Layout { .. } => file_name,
            Candidate::Function {
                name,
                start_line,
                end_line,
                ..
            } => format!("{} -> fun {}() [lines {}-{}]", file_name, name, start_line, end_line),
            Candidate::String { key, entry_type, .. } => format!("{} ({})", key, entry_type),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageVerdict {
    Used,
    Unused,
}

/// What removing a candidate touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// The declaring file itself
    WholeFile,
    /// Lines of the declaring file, 0-based inclusive
    Lines { start: usize, end: usize },
    /// An entry of a resource table
    TableEntry,
}

impl Span {
    fn contains(&self, other: &Span) -> bool {
        match (self, other) {
            (Span::Lines { start, end }, Span::Lines { start: s, end: e }) => {
                start <= s && e <= end && (start, end) != (s, e)
            }
            _ => false,
        }
    }
}

/// Verdict for one candidate, computed from a single snapshot
#[derive(Debug, Clone)]
pub struct Decision {
    pub candidate: Candidate,
    pub verdict: UsageVerdict,
    pub span: Span,
    /// First file that references the candidate, if any
    pub referenced_from: Option<PathBuf>,
}

impl Decision {
    pub fn is_unused(&self) -> bool {
        self.verdict == UsageVerdict::Unused
    }
}

/// One kind of removable artifact
pub trait CandidateKind {
    /// Short name used for report files, e.g. `classes`
    fn name(&self) -> &'static str;

    /// Files the usage search runs over
    fn inclusion(&self) -> InclusionRules;

    /// Every candidate found in `corpus`, in a deterministic order
    fn extract(&self, corpus: &Corpus) -> Result<Vec<Candidate>>;

    /// Regex whose match in another file makes `candidate` used
    fn usage_pattern(&self, candidate: &Candidate) -> Result<Regex>;

    fn span(&self, candidate: &Candidate) -> Span;

    /// Apply the removals planned for `unused`. Returns the number of
    /// candidates removed (or that would be, in a dry run).
    fn commit(&self, unused: &[&Decision], corpus: &Corpus, engine: &mut MutationEngine) -> Result<usize> {
        let mut removed = 0;
        let mut excisions: BTreeMap<&Path, Vec<(usize, usize)>> = BTreeMap::new();

        for decision in unused {
            let path = decision.candidate.declaring_file();
            match decision.span {
                Span::WholeFile => {
                    engine.delete_file(path)?;
                    removed += 1;
                }
                Span::Lines { start, end } => {
                    excisions.entry(path).or_default().push((start, end));
                    removed += 1;
                }
                Span::TableEntry => {}
            }
        }

        for (path, spans) in excisions {
            let Some(file) = corpus.get(path) else {
                continue;
            };
            engine.excise(path, file.text(), &spans)?;
        }

        Ok(removed)
    }
}

/// Drop unused line spans that sit inside another unused span of the same
/// file. They go away with their parent.
pub(crate) fn prune_nested(decisions: Vec<Decision>) -> Vec<Decision> {
    let outer: Vec<(PathBuf, Span)> = decisions
        .iter()
        .filter(|d| d.is_unused())
        .map(|d| (d.candidate.declaring_file().to_path_buf(), d.span))
        .collect();

    decisions
        .into_iter()
        .filter(|d| {
            !d.is_unused()
                || !outer
                    .iter()
                    .any(|(path, span)| path == d.candidate.declaring_file() && span.contains(&d.span))
        })
        .collect()
}
