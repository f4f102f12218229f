//! The four sweep tools and the options they share

mod classes;
mod functions;
mod layouts;
mod strings;

pub use classes::sweep_classes;
pub use functions::sweep_functions;
pub use layouts::sweep_layouts;
pub use strings::{sweep_strings, BACKUP_FILE_NAME};

use crate::analysis::Sweeper;
use crate::config::Config;
use crate::error::Result;
use crate::progress::ProgressReporter;
use crate::refactor::MutationEngine;
use crate::report::{Report, ReportFormat, Reporter};
use std::path::{Path, PathBuf};
use tracing::info;

/// One removable artifact family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Classes,
    Functions,
    Layouts,
    Strings,
}

impl Tool {
    /// Every tool, in the order `all` runs them
    pub const ALL: [Tool; 4] = [Tool::Classes, Tool::Functions, Tool::Layouts, Tool::Strings];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Classes => "classes",
            Tool::Functions => "functions",
            Tool::Layouts => "layouts",
            Tool::Strings => "strings",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Run-wide settings shared by every tool
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Project root
    pub root: PathBuf,
    pub dry_run: bool,
    /// Ask before committing live changes
    pub confirm: bool,
    /// Hide progress output
    pub quiet: bool,
    pub format: ReportFormat,
    /// Where reports go instead of the tool's default directory
    pub report_dir: Option<PathBuf>,
    pub undo_script: Option<PathBuf>,
}

impl SweepOptions {
    /// Dry run over `root` with default settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dry_run: true,
            confirm: false,
            quiet: true,
            format: ReportFormat::Text,
            report_dir: None,
            undo_script: None,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_report_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.report_dir = dir;
        self
    }

    pub fn mutation_engine(&self) -> MutationEngine {
        MutationEngine::new(self.dry_run)
            .with_confirmation(self.confirm)
            .with_undo(self.undo_script.is_some())
    }

    fn sweeper(&self, dry_run: bool) -> Sweeper {
        Sweeper::new(ProgressReporter::auto(self.quiet, dry_run))
    }

    fn write_report(&self, tool: Tool, report: Report, removed: usize, default_dir: &Path) -> Result<ToolOutcome> {
        let directory = self
            .report_dir
            .clone()
            .unwrap_or_else(|| default_dir.to_path_buf());
        let report_path = Reporter::new(self.format, directory).write(&report)?;
        info!("{} report written to {}", tool, report_path.display());

        Ok(ToolOutcome {
            tool,
            report,
            report_path,
            removed,
        })
    }
}

/// What a tool found and where its report went
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub tool: Tool,
    pub report: Report,
    pub report_path: PathBuf,
    /// Candidates removed, or that would be removed in a dry run
    pub removed: usize,
}

/// Run one tool with its own mutation engine
pub fn run_tool(tool: Tool, config: &Config, options: &SweepOptions) -> Result<ToolOutcome> {
    let mut engine = options.mutation_engine();
    let outcome = dispatch(tool, config, options, &mut engine)?;
    finish(&engine, options)?;
    Ok(outcome)
}

/// Run several tools in order, sharing one mutation engine and undo script
pub fn run_tools(tools: &[Tool], config: &Config, options: &SweepOptions) -> Result<Vec<ToolOutcome>> {
    let mut engine = options.mutation_engine();
    let mut outcomes = Vec::with_capacity(tools.len());

    for tool in tools {
        outcomes.push(dispatch(*tool, config, options, &mut engine)?);
    }

    finish(&engine, options)?;
    Ok(outcomes)
}

fn dispatch(tool: Tool, config: &Config, options: &SweepOptions, engine: &mut MutationEngine) -> Result<ToolOutcome> {
    info!("Running {} sweep on {}", tool, options.root.display());
    match tool {
        Tool::Classes => sweep_classes(config, options, engine),
        Tool::Functions => sweep_functions(config, options, engine),
        Tool::Layouts => sweep_layouts(config, options, engine),
        Tool::Strings => sweep_strings(config, options, engine),
    }
}

fn finish(engine: &MutationEngine, options: &SweepOptions) -> Result<()> {
    if let Some(path) = &options.undo_script {
        if engine.write_undo_script(path)? {
            info!("Undo script written to {}", path.display());
        }
    }
    Ok(())
}
