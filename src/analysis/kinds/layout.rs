use crate::analysis::{Candidate, CandidateKind, Span};
use crate::discovery::{Corpus, FileKind, InclusionRules};
use crate::error::Result;
use regex::Regex;
use std::path::PathBuf;

/// XML layouts under the layout directory
pub struct LayoutKind {
    layout_dir: PathBuf,
    view_binding: bool,
}

impl LayoutKind {
    pub fn new(layout_dir: PathBuf) -> Self {
        Self {
            layout_dir,
            view_binding: false,
        }
    }

    /// Also count references to the generated view-binding class
    pub fn with_view_binding(mut self, enabled: bool) -> Self {
        self.view_binding = enabled;
        self
    }
}

/// `activity_main` -> `ActivityMainBinding`
pub fn binding_class_name(layout: &str) -> String {
    let mut name: String = layout
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    name.push_str("Binding");
    name
}

impl CandidateKind for LayoutKind {
    fn name(&self) -> &'static str {
        "layouts"
    }

    fn inclusion(&self) -> InclusionRules {
        InclusionRules::sources_and_markup()
    }

    fn extract(&self, corpus: &Corpus) -> Result<Vec<Candidate>> {
        Ok(corpus
            .files()
            .filter(|file| file.kind == FileKind::Markup && file.path.starts_with(&self.layout_dir))
            .filter(|file| !file.stem().is_empty())
            .map(|file| Candidate::Layout {
                name: file.stem().to_string(),
                declaring_file: file.path.clone(),
            })
            .collect())
    }

    fn usage_pattern(&self, candidate: &Candidate) -> Result<Regex> {
        let name = candidate.name();
        let mut pattern = format!(r"(?:R\.layout\.|@layout/){}\b", regex::escape(name));
        if self.view_binding {
            pattern.push_str(&format!(r"|\b{}\b", regex::escape(&binding_class_name(name))));
        }
        Ok(Regex::new(&pattern)?)
    }

    fn span(&self, _candidate: &Candidate) -> Span {
        Span::WholeFile
    }
}
