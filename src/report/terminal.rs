use super::Report;
use colored::Colorize;
use std::path::Path;

/// Colored end-of-run summary on stdout
pub struct TerminalReporter {
    /// How many entries of each section to list before eliding
    max_entries: usize,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { max_entries: 10 }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn print(&self, report: &Report, written_to: &Path) {
        println!();
        let mode = if report.dry_run {
            report.mode().yellow().bold()
        } else {
            report.mode().red().bold()
        };
        println!("{} ({})", report.title.bold(), mode);

        for line in &report.summary {
            let count = if line.count == 0 {
                line.count.to_string().green()
            } else {
                line.count.to_string().cyan()
            };
            println!("  {} {}", format!("{}:", line.label).dimmed(), count);
        }

        for section in report.sections.iter().filter(|s| s.title.starts_with("UNUSED")) {
            if section.entries.is_empty() {
                continue;
            }
            println!();
            println!("{}", section.title.yellow());
            for entry in section.entries.iter().take(self.max_entries) {
                println!("  {} {}", "-".dimmed(), entry.label);
            }
            if section.entries.len() > self.max_entries {
                println!("  ... and {} more", section.entries.len() - self.max_entries);
            }
        }

        println!();
        println!("{} {}", "Report saved to:".green(), written_to.display());
        if report.dry_run {
            println!("{}", "Tip: Run with --delete to remove unused items".dimmed());
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
