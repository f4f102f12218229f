use crate::analysis::{Candidate, CandidateKind, Span};
use crate::discovery::{Corpus, FileKind, InclusionRules};
use crate::error::Result;
use crate::parser::FunctionScanner;
use regex::Regex;

/// Kotlin `fun` and Java `void` declarations, removed by excising their span
pub struct FunctionKind {
    excluded_names: Vec<String>,
}

impl FunctionKind {
    pub fn new(excluded_names: Vec<String>) -> Self {
        Self { excluded_names }
    }
}

impl CandidateKind for FunctionKind {
    fn name(&self) -> &'static str {
        "functions"
    }

    fn inclusion(&self) -> InclusionRules {
        InclusionRules::sources()
    }

    fn extract(&self, corpus: &Corpus) -> Result<Vec<Candidate>> {
        let scanner = FunctionScanner::new(&self.excluded_names);

        Ok(corpus
            .files()
            .filter(|file| file.kind == FileKind::Source)
            .flat_map(|file| {
                scanner
                    .scan(file.text())
                    .into_iter()
                    .map(move |decl| Candidate::Function {
                        name: decl.name,
                        declaring_file: file.path.clone(),
                        start_line: decl.start_line + 1,
                        end_line: decl.end_line + 1,
                    })
            })
            .collect())
    }

    fn usage_pattern(&self, candidate: &Candidate) -> Result<Regex> {
        Ok(Regex::new(&format!(r"\b{}\s*\(", regex::escape(candidate.name())))?)
    }

    fn span(&self, candidate: &Candidate) -> Span {
        match candidate {
            Candidate::Function {
                start_line,
                end_line,
                ..
            } => Span::Lines {
                start: start_line - 1,
                end: end_line - 1,
            },
            _ => Span::WholeFile,
        }
    }
}
