//! String table cleanup and translation checks

use deadsweep::parser::xml::{EntryType, StringResources};
use deadsweep::tools::BACKUP_FILE_NAME;
use deadsweep::{run_tool, Config, SweepError, SweepOptions, Tool};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RES: &str = "app/src/main/res";

const BASE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Demo</string>
    <string name="welcome">Hello %s, you have %d messages</string>
    <string name="unused_title">Old</string>
    <plurals name="songs">
        <item quantity="one">%d song</item>
        <item quantity="other">%d songs</item>
    </plurals>
    <plurals name="unused_plural">
        <item quantity="other">x</item>
    </plurals>
</resources>
"#;

const FRENCH: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">Demo</string>
    <string name="welcome">Bonjour %@, vous avez %@ messages</string>
    <string name="unused_title">Vieux</string>
    <plurals name="songs">
        <item quantity="one">%d chanson</item>
        <item quantity="other">%d chansons</item>
    </plurals>
</resources>
"#;

const GERMAN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="welcome">Hallo %d, %s Nachrichten</string>
</resources>
"#;

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn strings_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    populate(dir.path());
    dir
}

fn populate(root: &Path) {
    write(root, &format!("{}/values/strings.xml", RES), BASE);
    write(root, &format!("{}/values-fr/strings.xml", RES), FRENCH);
    write(root, &format!("{}/values-de/strings.xml", RES), GERMAN);
    write(
        root,
        "app/src/main/java/com/example/Main.kt",
        "val w = getString(R.string.welcome)\nval s = resources.getQuantityString(R.plurals.songs, 2, 2)\n",
    );
    write(
        root,
        &format!("{}/layout/activity_main.xml", RES),
        "<TextView android:text=\"@string/app_name\" />\n",
    );
}

fn table(root: &Path, language: &str) -> PathBuf {
    root.join(RES).join(language).join("strings.xml")
}

fn parse(path: &Path) -> StringResources {
    StringResources::parse(path, &fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_dry_run_reports_without_touching() {
    let project = strings_project();
    let options = SweepOptions::new(project.path());

    let outcome = run_tool(Tool::Strings, &Config::default(), &options).unwrap();

    assert_eq!(outcome.removed, 2);
    assert_eq!(outcome.report.count("Unused"), Some(2));
    assert_eq!(outcome.report.count("Used"), Some(3));
    assert_eq!(outcome.report.count("Placeholder fixes"), Some(2));
    assert_eq!(outcome.report.count("Placeholder mismatches"), Some(1));
    assert_eq!(outcome.report.count("Untranslated"), Some(1));

    assert_eq!(fs::read_to_string(table(project.path(), "values")).unwrap(), BASE);
    assert_eq!(fs::read_to_string(table(project.path(), "values-fr")).unwrap(), FRENCH);
    assert!(!project.path().join(RES).join("values-fr").join(BACKUP_FILE_NAME).exists());

    // Strings reports go to the resources root
    assert_eq!(outcome.report_path.parent().unwrap(), project.path().join(RES));
    let name = outcome.report_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("strings_dryrun_report_"));
}

#[test]
fn test_unused_sections_sorted() {
    let project = strings_project();
    let outcome = run_tool(Tool::Strings, &Config::default(), &SweepOptions::new(project.path())).unwrap();

    let unused = outcome
        .report
        .sections
        .iter()
        .find(|s| s.title == "UNUSED Strings")
        .unwrap();
    let labels: Vec<_> = unused.entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["unused_plural (PLURALS)", "unused_title (STRING)"]);

    let mismatches = outcome
        .report
        .sections
        .iter()
        .find(|s| s.title == "PLACEHOLDER MISMATCHES")
        .unwrap();
    assert_eq!(mismatches.entries[0].label, "values-de/welcome");
    assert_eq!(
        mismatches.entries[0].detail.as_deref(),
        Some("base [%s, %d] vs translated [%d, %s]")
    );
}

#[test]
fn test_live_cleanup_and_placeholder_fix() {
    let project = strings_project();
    let options = SweepOptions::new(project.path()).with_dry_run(false);

    let outcome = run_tool(Tool::Strings, &Config::default(), &options).unwrap();
    assert_eq!(outcome.removed, 2);
    assert!(!outcome.report.dry_run);

    let base = parse(&table(project.path(), "values"));
    let keys: Vec<_> = base.keys().collect();
    assert_eq!(keys, vec!["app_name", "welcome", "songs"]);

    // Plurals survive the rebuild with every item
    let songs = base.get("songs").unwrap();
    assert_eq!(songs.entry_type, EntryType::Plurals);
    let items: Vec<_> = songs
        .items
        .iter()
        .map(|i| (i.quantity.as_str(), i.raw.as_str()))
        .collect();
    assert_eq!(items, vec![("one", "%d song"), ("other", "%d songs")]);

    let french = parse(&table(project.path(), "values-fr"));
    assert!(french.get("unused_title").is_none());
    assert_eq!(
        french.get("welcome").unwrap().raw,
        "Bonjour %s, vous avez %d messages"
    );

    // Backup holds the table as it was before the placeholder rewrite
    let backup = project.path().join(RES).join("values-fr").join(BACKUP_FILE_NAME);
    let backup = fs::read_to_string(backup).unwrap();
    assert!(backup.contains("%@"));
    assert!(!backup.contains("unused_title"));

    // German had nothing to clean or fix
    assert_eq!(fs::read_to_string(table(project.path(), "values-de")).unwrap(), GERMAN);
}

#[test]
fn test_existing_backup_is_never_overwritten() {
    let project = strings_project();
    let backup = write(
        project.path(),
        &format!("{}/values-fr/{}", RES, BACKUP_FILE_NAME),
        "sentinel",
    );
    let options = SweepOptions::new(project.path()).with_dry_run(false);

    run_tool(Tool::Strings, &Config::default(), &options).unwrap();

    assert_eq!(fs::read_to_string(backup).unwrap(), "sentinel");
    let french = parse(&table(project.path(), "values-fr"));
    assert_eq!(
        french.get("welcome").unwrap().raw,
        "Bonjour %s, vous avez %d messages"
    );
}

#[test]
fn test_second_live_run_changes_nothing() {
    let project = strings_project();
    let options = SweepOptions::new(project.path()).with_dry_run(false);

    run_tool(Tool::Strings, &Config::default(), &options).unwrap();
    let base = fs::read_to_string(table(project.path(), "values")).unwrap();
    let french = fs::read_to_string(table(project.path(), "values-fr")).unwrap();

    let outcome = run_tool(Tool::Strings, &Config::default(), &options).unwrap();
    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.report.count("Placeholder fixes"), Some(0));
    assert_eq!(fs::read_to_string(table(project.path(), "values")).unwrap(), base);
    assert_eq!(fs::read_to_string(table(project.path(), "values-fr")).unwrap(), french);
}

#[test]
fn test_missing_base_aborts() {
    let project = TempDir::new().unwrap();
    write(project.path(), &format!("{}/values-fr/strings.xml", RES), FRENCH);

    let result = run_tool(Tool::Strings, &Config::default(), &SweepOptions::new(project.path()));
    assert!(matches!(result, Err(SweepError::MissingBase { .. })));
}

#[test]
fn test_malformed_translation_is_skipped() {
    let project = strings_project();
    write(
        project.path(),
        &format!("{}/values-es/strings.xml", RES),
        "<resources><string name=\"welcome\">roto</resources>",
    );

    let outcome = run_tool(Tool::Strings, &Config::default(), &SweepOptions::new(project.path())).unwrap();
    assert_eq!(outcome.report.count("Translations"), Some(2));
}

#[test]
fn test_translation_only_reference_does_not_count() {
    let project = strings_project();
    // A translation file mentioning a key is not a usage
    write(
        project.path(),
        &format!("{}/values-it/strings.xml", RES),
        "<resources><string name=\"note\">@string/unused_title</string></resources>",
    );

    let outcome = run_tool(Tool::Strings, &Config::default(), &SweepOptions::new(project.path())).unwrap();
    assert_eq!(outcome.report.count("Unused"), Some(2));
}

#[test]
fn test_project_checked_out_under_build_dir() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("build").join("myapp");
    populate(&root);
    let options = SweepOptions::new(&root).with_dry_run(false);

    let outcome = run_tool(Tool::Strings, &Config::default(), &options).unwrap();

    assert_eq!(outcome.report.count("Unused"), Some(2));
    let keys: Vec<_> = parse(&table(&root, "values")).keys().map(String::from).collect();
    assert_eq!(keys, vec!["app_name", "welcome", "songs"]);
}
