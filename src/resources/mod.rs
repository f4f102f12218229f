//! Localized string tables
//!
//! A resources root holds one directory per language (`values`, `values-fr`,
//! `values-pt-rBR`, ...). The unqualified directory is the base language and
//! is the only table usage is decided against.

pub mod placeholders;

use crate::config::StringConfig;
use crate::error::{Result, SweepError};
use crate::parser::xml::StringResources;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// String table of one language directory
#[derive(Debug, Clone)]
pub struct LanguageTable {
    /// Directory name, e.g. `values-fr`
    pub language: String,
    pub path: PathBuf,
    pub resources: StringResources,
}

impl LanguageTable {
    pub fn load(language: String, path: PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(&path).map_err(|e| SweepError::io(&path, e))?;
        let resources = StringResources::parse(&path, &contents)?;
        Ok(Self {
            language,
            path,
            resources,
        })
    }
}

/// Base table plus every translation that parsed
#[derive(Debug, Clone)]
pub struct ResourceSet {
    pub res_dir: PathBuf,
    pub base: LanguageTable,
    pub translations: Vec<LanguageTable>,
}

impl ResourceSet {
    /// Load all language tables under `res_dir`.
    ///
    /// A missing or malformed base table is an error; a malformed translation
    /// is logged and left out.
    pub fn load(res_dir: &Path, config: &StringConfig) -> Result<Self> {
        let base_path = res_dir.join(&config.base_dir).join(&config.file_name);
        if !res_dir.is_dir() || !base_path.is_file() {
            return Err(SweepError::MissingBase { path: base_path });
        }

        let base = LanguageTable::load(config.base_dir.clone(), base_path)?;
        let mut translations = Vec::new();

        for dir in language_dirs(res_dir, config) {
            let language = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if language == config.base_dir {
                continue;
            }

            let path = dir.join(&config.file_name);
            if !path.is_file() {
                continue;
            }

            match LanguageTable::load(language, path) {
                Ok(table) => translations.push(table),
                Err(e) => warn!("Skipping translation: {}", e),
            }
        }

        debug!(
            "Loaded base table with {} entries and {} translations",
            base.resources.entries.len(),
            translations.len()
        );

        Ok(Self {
            res_dir: res_dir.to_path_buf(),
            base,
            translations,
        })
    }

    /// Base first, then translations in directory order
    pub fn tables(&self) -> impl Iterator<Item = &LanguageTable> {
        std::iter::once(&self.base).chain(self.translations.iter())
    }
}

/// Language directories under `res_dir`, sorted by name
pub fn language_dirs(res_dir: &Path, config: &StringConfig) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(res_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(&config.values_prefix)
        })
        .map(|entry| entry.into_path())
        .collect();

    dirs.sort();
    dirs
}
