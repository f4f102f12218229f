//! Sweep reports
//!
//! Every tool invocation produces one `Report`, rendered as text or JSON and
//! written next to the project (or resources) it describes.

mod json;
mod terminal;
mod text;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;
pub use text::TextReporter;

use crate::analysis::Decision;
use crate::error::{Result, SweepError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Timestamp layout used in report headers and file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Output format for report files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(SweepError::Config(format!("unknown report format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ReportEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub entries: Vec<ReportEntry>,
}

impl ReportSection {
    pub fn new(title: impl Into<String>, entries: Vec<ReportEntry>) -> Self {
        Self {
            title: title.into(),
            entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub tool: String,
    pub dry_run: bool,
    pub generated: String,
    pub project: PathBuf,
    pub summary: Vec<SummaryLine>,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(tool: &str, title: &str, dry_run: bool, project: &Path) -> Self {
        Self::at(tool, title, dry_run, project, Local::now())
    }

    /// Report stamped with a fixed time
    pub fn at(tool: &str, title: &str, dry_run: bool, project: &Path, time: DateTime<Local>) -> Self {
        Self {
            title: title.to_string(),
            tool: tool.to_string(),
            dry_run,
            generated: time.format(TIMESTAMP_FORMAT).to_string(),
            project: std::fs::canonicalize(project).unwrap_or_else(|_| project.to_path_buf()),
            summary: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn summary_line(&mut self, label: impl Into<String>, count: usize) {
        self.summary.push(SummaryLine {
            label: label.into(),
            count,
        });
    }

    pub fn section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    /// Summary count by label
    pub fn count(&self, label: &str) -> Option<usize> {
        self.summary.iter().find(|l| l.label == label).map(|l| l.count)
    }

    pub fn mode(&self) -> &'static str {
        if self.dry_run {
            "DRY RUN"
        } else {
            "DELETION"
        }
    }

    /// `<tool>_<dryrun|deleted>_report_<timestamp>.<ext>`
    pub fn file_name(&self, format: ReportFormat) -> String {
        format!(
            "{}_{}_report_{}.{}",
            self.tool,
            if self.dry_run { "dryrun" } else { "deleted" },
            self.generated,
            format.extension()
        )
    }
}

/// Used-then-unused entries for a list of decisions.
/// `sorted` orders each section alphabetically by label.
pub fn decision_sections(
    decisions: &[Decision],
    noun: &str,
    sorted: bool,
    project: &Path,
) -> (ReportSection, ReportSection) {
    let mut used = Vec::new();
    let mut unused = Vec::new();

    for decision in decisions {
        let entry = ReportEntry::new(decision.candidate.label());
        if decision.is_unused() {
            unused.push(entry);
        } else {
            let entry = match &decision.referenced_from {
                Some(path) => entry.with_detail(format!(
                    "referenced from {}",
                    path.strip_prefix(project).unwrap_or(path).display()
                )),
                None => entry,
            };
            used.push(entry);
        }
    }

    if sorted {
        used.sort_by(|a, b| a.label.cmp(&b.label));
        unused.sort_by(|a, b| a.label.cmp(&b.label));
    }

    (
        ReportSection::new(format!("USED {}", noun), used),
        ReportSection::new(format!("UNUSED {}", noun), unused),
    )
}

/// Writes report files
pub struct Reporter {
    format: ReportFormat,
    directory: PathBuf,
}

impl Reporter {
    pub fn new(format: ReportFormat, directory: PathBuf) -> Self {
        Self { format, directory }
    }

    pub fn render(&self, report: &Report) -> Result<String> {
        match self.format {
            ReportFormat::Text => Ok(TextReporter::new().render(report)),
            ReportFormat::Json => JsonReporter::new().render(report),
        }
    }

    /// Write `report` and return the file it went to
    pub fn write(&self, report: &Report) -> Result<PathBuf> {
        let contents = self.render(report)?;
        std::fs::create_dir_all(&self.directory).map_err(|e| SweepError::io(&self.directory, e))?;

        let path = self.directory.join(report.file_name(self.format));
        std::fs::write(&path, contents).map_err(|e| SweepError::io(&path, e))?;
        Ok(path)
    }
}
