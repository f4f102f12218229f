use crate::error::{Result, SweepError};
use crate::parser::split_lines;
use std::path::Path;

/// Line-level text surgery
pub struct FileEditor;

impl FileEditor {
    pub fn new() -> Self {
        Self
    }

    /// Remove whole lines from `contents`.
    ///
    /// `spans` are 0-based inclusive line ranges; every other line keeps its
    /// exact bytes, terminator included.
    pub fn excise_lines(&self, contents: &str, spans: &[(usize, usize)]) -> String {
        split_lines(contents)
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !spans.iter().any(|(start, end)| i >= start && i <= end))
            .map(|(_, line)| line)
            .collect()
    }

    pub fn write(&self, path: &Path, contents: &str) -> Result<()> {
        std::fs::write(path, contents).map_err(|e| SweepError::io(path, e))
    }

    pub fn delete(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(|e| SweepError::io(path, e))
    }

    /// Copy `path` to `backup` unless `backup` already exists.
    /// Returns whether a copy was made.
    pub fn backup_once(&self, path: &Path, backup: &Path) -> Result<bool> {
        if backup.exists() {
            return Ok(false);
        }
        std::fs::copy(path, backup).map_err(|e| SweepError::io(backup, e))?;
        Ok(true)
    }
}

impl Default for FileEditor {
    fn default() -> Self {
        Self::new()
    }
}
