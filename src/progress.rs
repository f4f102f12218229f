//! Per-candidate progress feedback

use colored::Colorize;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// How progress is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// One `[NNN%]` line per candidate
    Lines,
    /// An indicatif bar, for interactive terminals
    Bar,
    Hidden,
}

pub struct ProgressReporter {
    mode: ProgressMode,
    dry_run: bool,
    bar: Option<ProgressBar>,
}

/// `(index + 1) * 100 / total`, truncated
pub fn percent(index: usize, total: usize) -> usize {
    if total == 0 {
        return 100;
    }
    (index + 1) * 100 / total
}

impl ProgressReporter {
    pub fn new(mode: ProgressMode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            bar: None,
        }
    }

    /// Bar on a terminal, plain lines when piped, nothing when quiet
    pub fn auto(quiet: bool, dry_run: bool) -> Self {
        let mode = if quiet {
            ProgressMode::Hidden
        } else if Term::stdout().is_term() {
            ProgressMode::Bar
        } else {
            ProgressMode::Lines
        };
        Self::new(mode, dry_run)
    }

    pub fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Start a pass over `total` candidates
    pub fn begin(&mut self, total: usize, what: &str) {
        if self.mode != ProgressMode::Bar {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar.set_message(format!("checking {}", what));
        self.bar = Some(bar);
    }

    /// Report the verdict on candidate `index` of `total`
    pub fn record(&mut self, index: usize, total: usize, label: &str, used: bool) {
        match self.mode {
            ProgressMode::Hidden => {}
            ProgressMode::Bar => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
            }
            ProgressMode::Lines => {
                println!("{}", self.line(index, total, label, used));
            }
        }
    }

    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn line(&self, index: usize, total: usize, label: &str, used: bool) -> String {
        let status = if used {
            format!("Used: {}", label).green().to_string()
        } else if self.dry_run {
            format!("Unused: {} (would delete)", label).red().to_string()
        } else {
            format!("Unused: {} (deleted)", label).red().to_string()
        };
        format!("[{:>3}%] {}", percent(index, total), status)
    }
}
