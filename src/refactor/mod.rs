//! Mutation engine
//!
//! Every destructive operation goes through `MutationEngine`, which honors the
//! run-wide dry-run flag, records undo state and counts what it did.

mod editor;
mod undo;

pub use editor::FileEditor;
pub use undo::UndoScript;

use crate::error::{Result, SweepError};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// What a pass changed on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MutationStats {
    pub files_deleted: usize,
    pub files_rewritten: usize,
    pub backups_created: usize,
}

pub struct MutationEngine {
    dry_run: bool,
    interactive: bool,
    editor: FileEditor,
    undo: Option<UndoScript>,
    stats: MutationStats,
}

impl MutationEngine {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            interactive: false,
            editor: FileEditor::new(),
            undo: None,
            stats: MutationStats::default(),
        }
    }

    /// Ask before committing live changes
    pub fn with_confirmation(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Keep original contents of touched files for an undo script
    pub fn with_undo(mut self, enabled: bool) -> Self {
        self.undo = enabled.then(UndoScript::new);
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn stats(&self) -> &MutationStats {
        &self.stats
    }

    /// Confirm a batch of live changes. A refusal turns the rest of the run
    /// into a dry run.
    pub fn approve(&mut self, count: usize, what: &str) -> Result<bool> {
        if self.dry_run || count == 0 {
            return Ok(false);
        }
        if !self.interactive {
            return Ok(true);
        }

        let approved = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete {} {}?", count, what))
            .default(false)
            .interact()
            .map_err(|e| SweepError::Prompt(e.to_string()))?;

        if !approved {
            println!("{}", "Skipped. Continuing as a dry run.".yellow());
            self.dry_run = true;
        }
        Ok(approved)
    }

    /// Delete a file. Returns whether anything was removed.
    pub fn delete_file(&mut self, path: &Path) -> Result<bool> {
        if self.dry_run {
            debug!("Would delete {}", path.display());
            return Ok(false);
        }

        self.record(path);
        self.editor.delete(path)?;
        self.stats.files_deleted += 1;
        info!("Deleted {}", path.display());
        Ok(true)
    }

    /// Remove line spans from a file whose snapshot is `contents`
    pub fn excise(&mut self, path: &Path, contents: &str, spans: &[(usize, usize)]) -> Result<bool> {
        if spans.is_empty() {
            return Ok(false);
        }
        let updated = self.editor.excise_lines(contents, spans);
        self.rewrite(path, &updated)
    }

    /// Overwrite a file. Returns whether anything was written.
    pub fn rewrite(&mut self, path: &Path, contents: &str) -> Result<bool> {
        if self.dry_run {
            debug!("Would rewrite {}", path.display());
            return Ok(false);
        }

        self.record(path);
        self.editor.write(path, contents)?;
        self.stats.files_rewritten += 1;
        info!("Rewrote {}", path.display());
        Ok(true)
    }

    /// Copy `path` to `backup` before a rewrite, unless a backup exists
    pub fn backup_once(&mut self, path: &Path, backup: &Path) -> Result<bool> {
        if self.dry_run {
            return Ok(false);
        }

        let created = self.editor.backup_once(path, backup)?;
        if created {
            self.stats.backups_created += 1;
            info!("Backed up {} to {}", path.display(), backup.display());
        }
        Ok(created)
    }

    /// Write the undo script if one was requested and something changed
    pub fn write_undo_script(&self, path: &Path) -> Result<bool> {
        match &self.undo {
            Some(script) if script.file_count() > 0 => {
                script.write(path)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn record(&mut self, path: &Path) {
        if let Some(script) = self.undo.as_mut() {
            if let Ok(contents) = std::fs::read_to_string(path) {
                script.record_file_state(path, &contents);
            }
        }
    }
}
