use super::{SweepOptions, Tool, ToolOutcome};
use crate::analysis::{CandidateKind, Decision, LayoutKind};
use crate::config::Config;
use crate::discovery::CorpusLoader;
use crate::error::Result;
use crate::refactor::MutationEngine;
use crate::report::{decision_sections, Report, ReportEntry, ReportSection};
use tracing::info;

/// Delete unreferenced layouts, repeating until a phase deletes nothing.
///
/// A layout only included by a deleted layout becomes unused in the next
/// phase. Dry runs drop would-be deletions from the in-memory corpus so they
/// converge the same way.
pub fn sweep_layouts(config: &Config, options: &SweepOptions, engine: &mut MutationEngine) -> Result<ToolOutcome> {
    let kind = LayoutKind::new(config.layout_dir(&options.root)).with_view_binding(config.layouts.view_binding);
    let loader = CorpusLoader::new(config);
    let mut corpus = loader.load(&options.root, &kind.inclusion())?;

    let mut sweeper = options.sweeper(engine.is_dry_run());
    let mut phases: Vec<usize> = Vec::new();
    let mut removed_total = 0;
    let mut total_scanned = None;
    let mut deleted: Vec<Decision> = Vec::new();

    let last = loop {
        let phase = phases.len() + 1;
        info!("Phase {}: scanning layouts", phase);

        let decisions = sweeper.plan(&kind, &corpus)?;
        total_scanned.get_or_insert(decisions.len());
        let removed = sweeper.commit(&kind, &decisions, &corpus, engine)?;
        phases.push(removed);
        removed_total += removed;

        info!("Phase {}: {} layouts removed", phase, removed);
        if removed == 0 {
            break decisions;
        }

        let unused: Vec<Decision> = decisions.into_iter().filter(|d| d.is_unused()).collect();

        if engine.is_dry_run() {
            for decision in &unused {
                corpus.remove(decision.candidate.declaring_file());
            }
        } else {
            corpus = loader.load(&options.root, &kind.inclusion())?;
        }
        deleted.extend(unused);
    };

    let mut report = Report::new(
        Tool::Layouts.as_str(),
        "Layout Cleanup Report",
        engine.is_dry_run(),
        &options.root,
    );
    report.summary_line("Total scanned", total_scanned.unwrap_or(0));
    report.summary_line("Used", last.len());
    report.summary_line("Deleted", removed_total);
    report.summary_line("Phases", phases.len());
    for (i, count) in phases.iter().enumerate() {
        report.summary_line(format!("Phase {} deletions", i + 1), *count);
    }

    let (used_section, _) = decision_sections(&last, "Layouts", true, &options.root);
    let (_, deleted_section) = decision_sections(&deleted, "Layouts", true, &options.root);
    report.section(used_section);
    report.section(deleted_section);

    let mut per_phase = Vec::new();
    let mut offset = 0;
    for (i, count) in phases.iter().enumerate().filter(|(_, c)| **c > 0) {
        let mut labels: Vec<String> = deleted[offset..offset + count]
            .iter()
            .map(|d| d.candidate.label())
            .collect();
        labels.sort();
        per_phase.extend(
            labels
                .into_iter()
                .map(|label| ReportEntry::new(label).with_detail(format!("phase {}", i + 1))),
        );
        offset += count;
    }
    report.section(ReportSection::new("DELETIONS BY PHASE", per_phase));

    options.write_report(Tool::Layouts, report, removed_total, &options.root)
}
