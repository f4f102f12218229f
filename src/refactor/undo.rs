use crate::error::{Result, SweepError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Generates a shell script that restores every file a live run touched
pub struct UndoScript {
    /// Original file contents before deletion or rewrite
    file_states: BTreeMap<PathBuf, String>,
}

impl UndoScript {
    pub fn new() -> Self {
        Self {
            file_states: BTreeMap::new(),
        }
    }

    /// Record the state of a file before its first modification
    pub fn record_file_state(&mut self, path: &Path, contents: &str) {
        self.file_states
            .entry(path.to_path_buf())
            .or_insert_with(|| contents.to_string());
    }

    pub fn render(&self) -> String {
        let mut script = String::new();

        script.push_str("#!/bin/bash\n");
        script.push_str("# deadsweep undo script\n");
        script.push_str("# Run to restore deleted and rewritten files\n");
        script.push('\n');
        script.push_str("set -e\n");
        script.push('\n');

        for (file_path, contents) in &self.file_states {
            let escaped_path = file_path.display().to_string().replace('\'', "'\\''");

            script.push_str(&format!("# Restore {}\n", file_path.display()));
            script.push_str(&format!("mkdir -p \"$(dirname '{}')\"\n", escaped_path));
            let marker = heredoc_marker(contents);
            script.push_str(&format!("cat > '{}' << '{}'\n", escaped_path, marker));
            script.push_str(contents);
            if !contents.ends_with('\n') {
                script.push('\n');
            }
            script.push_str(&marker);
            script.push('\n');
            script.push_str(&format!("echo '  Restored: {}'\n", escaped_path));
            script.push('\n');
        }

        script.push_str("echo 'Done! All files restored.'\n");
        script
    }

    /// Write the undo script to a file
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).map_err(|e| SweepError::io(path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)
                .map_err(|e| SweepError::io(path, e))?
                .permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(path, perms).map_err(|e| SweepError::io(path, e))?;
        }

        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.file_states.len()
    }
}

/// A heredoc terminator that no line of `contents` can end early
fn heredoc_marker(contents: &str) -> String {
    let mut marker = String::from("DEADSWEEP_EOF");
    let mut n = 0;
    while contents.lines().any(|line| line == marker) {
        n += 1;
        marker = format!("DEADSWEEP_EOF_{}", n);
    }
    marker
}

impl Default for UndoScript {
    fn default() -> Self {
        Self::new()
    }
}
