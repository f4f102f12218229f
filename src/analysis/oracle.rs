use super::UsageVerdict;
use crate::discovery::Corpus;
use regex::Regex;
use std::path::Path;

/// Answers "is this symbol referenced anywhere else?" against one snapshot
pub struct UsageOracle<'a> {
    corpus: &'a Corpus,
}

impl<'a> UsageOracle<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    /// First file, other than the declaring one, whose text matches `pattern`
    pub fn first_reference(&self, pattern: &Regex, declaring_file: &Path) -> Option<&'a Path> {
        self.corpus
            .files()
            .filter(|file| file.path != declaring_file)
            .find(|file| pattern.is_match(file.text()))
            .map(|file| file.path.as_path())
    }

    pub fn verdict(&self, pattern: &Regex, declaring_file: &Path) -> UsageVerdict {
        match self.first_reference(pattern, declaring_file) {
            Some(_) => UsageVerdict::Used,
            None => UsageVerdict::Unused,
        }
    }
}
