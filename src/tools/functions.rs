use super::{SweepOptions, Tool, ToolOutcome};
use crate::analysis::{CandidateKind, FunctionKind};
use crate::config::Config;
use crate::discovery::CorpusLoader;
use crate::error::Result;
use crate::refactor::MutationEngine;
use crate::report::{decision_sections, Report};

/// Excise function declarations that are never called from another file.
///
/// A function that only a removed function called stays until the next run.
pub fn sweep_functions(config: &Config, options: &SweepOptions, engine: &mut MutationEngine) -> Result<ToolOutcome> {
    let kind = FunctionKind::new(config.functions.excluded_names.clone());
    let corpus = CorpusLoader::new(config).load(&options.root, &kind.inclusion())?;

    let mut sweeper = options.sweeper(engine.is_dry_run());
    let decisions = sweeper.plan(&kind, &corpus)?;
    let removed = sweeper.commit(&kind, &decisions, &corpus, engine)?;

    let unused = decisions.iter().filter(|d| d.is_unused()).count();
    let mut report = Report::new(
        Tool::Functions.as_str(),
        "Unused Function Report",
        engine.is_dry_run(),
        &options.root,
    );
    report.summary_line("Total scanned", decisions.len());
    report.summary_line("Used", decisions.len() - unused);
    report.summary_line("Unused", unused);
    report.summary_line("Files scanned", corpus.len());

    let (used_section, unused_section) = decision_sections(&decisions, "Functions", false, &options.root);
    report.section(used_section);
    report.section(unused_section);

    options.write_report(Tool::Functions, report, removed, &options.root)
}
