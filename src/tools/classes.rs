use super::{SweepOptions, Tool, ToolOutcome};
use crate::analysis::{CandidateKind, ClassKind};
use crate::config::Config;
use crate::discovery::CorpusLoader;
use crate::error::Result;
use crate::refactor::MutationEngine;
use crate::report::{decision_sections, Report};

/// Delete convention-named classes (`*Activity`, `*Fragment`, ...) that no
/// other file mentions
pub fn sweep_classes(config: &Config, options: &SweepOptions, engine: &mut MutationEngine) -> Result<ToolOutcome> {
    let kind = ClassKind::new(config.classes.suffixes.clone());
    let corpus = CorpusLoader::new(config).load(&options.root, &kind.inclusion())?;

    let mut sweeper = options.sweeper(engine.is_dry_run());
    let decisions = sweeper.plan(&kind, &corpus)?;
    let removed = sweeper.commit(&kind, &decisions, &corpus, engine)?;

    let unused = decisions.iter().filter(|d| d.is_unused()).count();
    let mut report = Report::new(
        Tool::Classes.as_str(),
        "Activity/Fragment/Adapter Usage Report",
        engine.is_dry_run(),
        &options.root,
    );
    report.summary_line("Total scanned", decisions.len());
    report.summary_line("Used", decisions.len() - unused);
    report.summary_line("Unused", unused);

    let (used_section, unused_section) = decision_sections(&decisions, "Classes", false, &options.root);
    report.section(used_section);
    report.section(unused_section);

    options.write_report(Tool::Classes, report, removed, &options.root)
}
