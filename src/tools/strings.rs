use super::{SweepOptions, Tool, ToolOutcome};
use crate::analysis::{CandidateKind, StringKind};
use crate::config::Config;
use crate::discovery::CorpusLoader;
use crate::error::Result;
use crate::refactor::MutationEngine;
use crate::report::{decision_sections, Report, ReportEntry, ReportSection};
use crate::resources::placeholders::{find_mismatches, find_untranslated, fix_generic_placeholders};
use crate::resources::ResourceSet;
use std::collections::HashSet;
use tracing::{info, warn};

/// Written beside a translation before its first placeholder rewrite
pub const BACKUP_FILE_NAME: &str = "strings_backup_phase1.xml";

/// Remove unused string keys from every language, then check translations:
/// generic `%@` markers are replaced by the base language's typed
/// placeholders, placeholder mismatches and untranslated copies are reported.
pub fn sweep_strings(config: &Config, options: &SweepOptions, engine: &mut MutationEngine) -> Result<ToolOutcome> {
    let res_dir = config.res_dir(&options.root);
    let resources = ResourceSet::load(&res_dir, &config.strings)?;
    let kind = StringKind::new(resources, config.strings.usage_exclude.clone());
    let corpus = CorpusLoader::new(config).load(&options.root, &kind.inclusion())?;

    // Cleanup of unused keys
    let mut sweeper = options.sweeper(engine.is_dry_run());
    let decisions = sweeper.plan(&kind, &corpus)?;
    let removed = sweeper.commit(&kind, &decisions, &corpus, engine)?;

    let mut set = if engine.is_dry_run() {
        let used: HashSet<&str> = decisions
            .iter()
            .filter(|d| !d.is_unused())
            .map(|d| d.candidate.name())
            .collect();
        let mut set = kind.resources().clone();
        for table in std::iter::once(&mut set.base).chain(set.translations.iter_mut()) {
            table.resources.entries.retain(|e| used.contains(e.key.as_str()));
        }
        set
    } else {
        ResourceSet::load(&res_dir, &config.strings)?
    };

    // Phase 1: generic markers
    let fix = fix_generic_placeholders(&mut set);
    info!("Phase 1: {} placeholder substitutions", fix.substitutions.len());
    for index in &fix.changed {
        let table = &set.translations[*index];
        let Some(dir) = table.path.parent() else {
            warn!("No directory for {}", table.path.display());
            continue;
        };
        engine.backup_once(&table.path, &dir.join(BACKUP_FILE_NAME))?;
        engine.rewrite(&table.path, &table.resources.render())?;
    }

    // Phase 2: placeholder consistency
    let mismatches = find_mismatches(&set);
    info!("Phase 2: {} placeholder mismatches", mismatches.len());

    // Phase 3: untranslated copies
    let copies = find_untranslated(&set);
    info!("Phase 3: {} untranslated strings", copies.len());

    let unused = decisions.iter().filter(|d| d.is_unused()).count();
    let mut report = Report::new(
        Tool::Strings.as_str(),
        "Unused Strings Report",
        engine.is_dry_run(),
        &res_dir,
    );
    report.summary_line("Total keys", decisions.len());
    report.summary_line("Used", decisions.len() - unused);
    report.summary_line("Unused", unused);
    report.summary_line("Translations", set.translations.len());
    report.summary_line("Placeholder fixes", fix.substitutions.len());
    report.summary_line("Placeholder mismatches", mismatches.len());
    report.summary_line("Untranslated", copies.len());

    let (used_section, unused_section) = decision_sections(&decisions, "Strings", true, &options.root);
    report.section(used_section);
    report.section(unused_section);

    report.section(ReportSection::new(
        "PLACEHOLDER FIXES",
        fix.substitutions
            .iter()
            .map(|s| {
                ReportEntry::new(format!("{}/{}", s.language, s.key))
                    .with_detail(format!("%@ -> {}", s.placeholder))
            })
            .collect(),
    ));
    report.section(ReportSection::new(
        "PLACEHOLDER MISMATCHES",
        mismatches
            .iter()
            .map(|m| {
                ReportEntry::new(format!("{}/{}", m.language, m.key)).with_detail(format!(
                    "base [{}] vs translated [{}]",
                    m.base.join(", "),
                    m.translated.join(", ")
                ))
            })
            .collect(),
    ));
    report.section(ReportSection::new(
        "UNTRANSLATED",
        copies
            .iter()
            .map(|c| ReportEntry::new(format!("{}/{}", c.language, c.key)).with_detail(c.value.clone()))
            .collect(),
    ));

    options.write_report(Tool::Strings, report, removed, &res_dir)
}
