use crate::config::Config;
use crate::error::{Result, SweepError};
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Kind of corpus file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Kotlin or Java source
    Source,
    /// XML markup or resource
    Markup,
}

impl FileKind {
    /// Determine file kind from path using the configured extensions
    pub fn from_path(path: &Path, config: &Config) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        if config.sources.extensions.iter().any(|e| e == extension) {
            Some(FileKind::Source)
        } else if config.sources.markup_extension == extension {
            Some(FileKind::Markup)
        } else {
            None
        }
    }
}

/// One file of the corpus with its text snapshot
#[derive(Debug, Clone)]
pub struct CorpusFile {
    pub path: PathBuf,
    pub kind: FileKind,
    text: String,
}

impl CorpusFile {
    pub fn new(path: PathBuf, kind: FileKind, text: String) -> Self {
        Self { path, kind, text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name without extension
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

/// Immutable snapshot of every file a pass looks at, keyed and ordered by path
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    files: BTreeMap<PathBuf, CorpusFile>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: CorpusFile) {
        self.files.insert(file.path.clone(), file);
    }

    /// Drop a file from the snapshot (used when a pass simulates a deletion)
    pub fn remove(&mut self, path: &Path) -> Option<CorpusFile> {
        self.files.remove(path)
    }

    pub fn get(&self, path: &Path) -> Option<&CorpusFile> {
        self.files.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &CorpusFile> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<CorpusFile> for Corpus {
    fn from_iter<I: IntoIterator<Item = CorpusFile>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for file in iter {
            corpus.insert(file);
        }
        corpus
    }
}

/// Predicate deciding which files enter a corpus
#[derive(Debug, Clone, Default)]
pub struct InclusionRules {
    pub source: bool,
    pub markup: bool,
    pub skip_tests: bool,
    pub skip_build: bool,
    /// Path fragments (with `/` separators) that exclude a file
    pub excluded_fragments: Vec<String>,
}

impl InclusionRules {
    /// Source files outside test directories
    pub fn sources() -> Self {
        Self {
            source: true,
            skip_tests: true,
            ..Self::default()
        }
    }

    /// Source and markup files outside test directories
    pub fn sources_and_markup() -> Self {
        Self {
            source: true,
            markup: true,
            skip_tests: true,
            ..Self::default()
        }
    }

    pub fn with_build_excluded(mut self) -> Self {
        self.skip_build = true;
        self
    }

    pub fn with_tests_included(mut self) -> Self {
        self.skip_tests = false;
        self
    }

    pub fn with_excluded_fragments(mut self, fragments: Vec<String>) -> Self {
        self.excluded_fragments = fragments;
        self
    }

    /// Directory predicates look only at the part of `path` below `root`,
    /// so a project checked out under `build/` or `test/` is still scanned.
    fn admits(&self, root: &Path, path: &Path, kind: FileKind, config: &Config) -> bool {
        let kind_ok = match kind {
            FileKind::Source => self.source,
            FileKind::Markup => self.markup,
        };
        if !kind_ok {
            return false;
        }

        let is_manifest = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.eq_ignore_ascii_case(&config.sources.manifest_name))
            .unwrap_or(false);
        if is_manifest {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if self.skip_tests && config.in_test_dir(relative) {
            return false;
        }
        if self.skip_build && config.in_build_dir(relative) {
            return false;
        }
        if config.should_exclude(relative) {
            return false;
        }

        let normalized = format!("/{}", relative.to_string_lossy().replace('\\', "/"));
        !self
            .excluded_fragments
            .iter()
            .any(|fragment| normalized.contains(fragment.as_str()))
    }
}

/// Builds corpus snapshots for a project
pub struct CorpusLoader<'a> {
    config: &'a Config,
}

impl<'a> CorpusLoader<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Walk `root` and read every file admitted by `rules`
    pub fn load(&self, root: &Path, rules: &InclusionRules) -> Result<Corpus> {
        if !root.is_dir() {
            return Err(SweepError::io(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "project directory not found"),
            ));
        }

        debug!("Scanning for files in: {}", root.display());

        let walker = WalkBuilder::new(root)
            .standard_filters(false) // hidden and ignored files count too
            .follow_links(false)
            .build();

        let corpus: Corpus = walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.into_path();
                let kind = FileKind::from_path(&path, self.config)?;

                if !rules.admits(root, &path, kind, self.config) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                let text = read_text_or_empty(&path);
                Some(CorpusFile::new(path, kind, text))
            })
            .collect();

        debug!("Loaded {} files", corpus.len());
        Ok(corpus)
    }
}

/// Read a file, treating any failure as empty text
pub fn read_text_or_empty(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!("Unreadable file {}: {}", path.display(), e);
            String::new()
        }
    }
}
