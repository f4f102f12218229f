//! Class and layout sweeps over small Android-shaped projects

use deadsweep::{run_tool, Config, SweepOptions, Tool};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

const SRC: &str = "app/src/main/java/com/example";
const LAYOUT: &str = "app/src/main/res/layout";

fn class_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, &format!("{}/MainActivity.kt", SRC), "class MainActivity : AppCompatActivity()\n");
    write(root, &format!("{}/OldFragment.kt", SRC), "class OldFragment : Fragment()\n");
    write(root, &format!("{}/UserAdapter.kt", SRC), "class UserAdapter\n");
    write(root, &format!("{}/Screen.kt", SRC), "val adapter = UserAdapter()\n");
    write(
        root,
        &format!("{}/activity_main.xml", LAYOUT),
        "<LinearLayout tools:context=\".MainActivity\" />\n",
    );
    // Manifest and test references never count
    write(
        root,
        "app/src/main/AndroidManifest.xml",
        "<activity android:name=\".OldFragment\" />\n",
    );
    write(
        root,
        "app/src/test/java/com/example/OldFragmentTest.kt",
        "val f = OldFragment()\n",
    );
    dir
}

fn layout_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(
        root,
        &format!("{}/MainActivity.kt", SRC),
        "class MainActivity {\n    fun show() = setContentView(R.layout.activity_main)\n}\n",
    );
    write(
        root,
        &format!("{}/activity_main.xml", LAYOUT),
        "<LinearLayout>\n    <include layout=\"@layout/item_header\" />\n</LinearLayout>\n",
    );
    write(root, &format!("{}/item_header.xml", LAYOUT), "<TextView />\n");
    write(
        root,
        &format!("{}/old_screen.xml", LAYOUT),
        "<FrameLayout>\n    <include layout=\"@layout/old_row\" />\n</FrameLayout>\n",
    );
    write(root, &format!("{}/old_row.xml", LAYOUT), "<TextView />\n");
    dir
}

fn section_labels(outcome: &deadsweep::ToolOutcome, title: &str) -> Vec<String> {
    outcome
        .report
        .sections
        .iter()
        .find(|s| s.title == title)
        .map(|s| s.entries.iter().map(|e| e.label.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn test_class_dry_run_is_idempotent() {
    let project = class_project();
    let options = SweepOptions::new(project.path());
    let config = Config::default();

    let first = run_tool(Tool::Classes, &config, &options).unwrap();
    let second = run_tool(Tool::Classes, &config, &options).unwrap();

    assert_eq!(first.removed, 1);
    assert_eq!(first.report.sections, second.report.sections);
    assert_eq!(section_labels(&first, "UNUSED Classes"), vec!["OldFragment.kt"]);
    assert_eq!(
        section_labels(&first, "USED Classes"),
        vec!["MainActivity.kt", "UserAdapter.kt"]
    );
    assert!(project.path().join(SRC).join("OldFragment.kt").exists());
    assert!(first.report.dry_run);
}

#[test]
fn test_class_live_run_deletes_unused() {
    let project = class_project();
    let options = SweepOptions::new(project.path()).with_dry_run(false);

    let outcome = run_tool(Tool::Classes, &Config::default(), &options).unwrap();

    assert_eq!(outcome.removed, 1);
    assert!(!outcome.report.dry_run);
    assert!(!project.path().join(SRC).join("OldFragment.kt").exists());
    assert!(project.path().join(SRC).join("MainActivity.kt").exists());
    assert!(project.path().join(SRC).join("UserAdapter.kt").exists());
}

#[test]
fn test_report_written_to_project_root() {
    let project = class_project();
    let options = SweepOptions::new(project.path());

    let outcome = run_tool(Tool::Classes, &Config::default(), &options).unwrap();

    assert_eq!(outcome.report_path.parent().unwrap(), project.path());
    let name = outcome.report_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("classes_dryrun_report_"));
    assert!(name.ends_with(".txt"));

    let text = fs::read_to_string(&outcome.report_path).unwrap();
    assert!(text.starts_with("Activity/Fragment/Adapter Usage Report (DRY RUN)\n"));
    assert!(text.contains("Generated: "));
    assert!(text.contains(" - Unused: 1\n"));
    assert!(text.contains(" - OldFragment.kt\n"));
}

#[test]
fn test_report_dir_override() {
    let project = class_project();
    let reports = TempDir::new().unwrap();
    let options = SweepOptions::new(project.path()).with_report_dir(Some(reports.path().to_path_buf()));

    let outcome = run_tool(Tool::Classes, &Config::default(), &options).unwrap();
    assert_eq!(outcome.report_path.parent().unwrap(), reports.path());
}

#[test]
fn test_layout_fixed_point_dry_run() {
    let project = layout_project();
    let options = SweepOptions::new(project.path());

    let outcome = run_tool(Tool::Layouts, &Config::default(), &options).unwrap();

    assert_eq!(outcome.removed, 2);
    assert_eq!(outcome.report.count("Deleted"), Some(2));
    assert_eq!(outcome.report.count("Phases"), Some(3));
    assert_eq!(outcome.report.count("Phase 1 deletions"), Some(1));
    assert_eq!(outcome.report.count("Phase 2 deletions"), Some(1));
    assert_eq!(outcome.report.count("Phase 3 deletions"), Some(0));
    assert_eq!(
        section_labels(&outcome, "UNUSED Layouts"),
        vec!["old_row.xml", "old_screen.xml"]
    );
    assert_eq!(
        section_labels(&outcome, "USED Layouts"),
        vec!["activity_main.xml", "item_header.xml"]
    );

    // Nothing touched
    assert!(project.path().join(LAYOUT).join("old_screen.xml").exists());
    assert!(project.path().join(LAYOUT).join("old_row.xml").exists());
}

#[test]
fn test_layout_fixed_point_live() {
    let project = layout_project();
    let options = SweepOptions::new(project.path()).with_dry_run(false);

    let outcome = run_tool(Tool::Layouts, &Config::default(), &options).unwrap();

    assert_eq!(outcome.removed, 2);
    assert_eq!(outcome.report.count("Phases"), Some(3));
    assert!(!project.path().join(LAYOUT).join("old_screen.xml").exists());
    assert!(!project.path().join(LAYOUT).join("old_row.xml").exists());
    assert!(project.path().join(LAYOUT).join("activity_main.xml").exists());
    assert!(project.path().join(LAYOUT).join("item_header.xml").exists());

    let by_phase = outcome
        .report
        .sections
        .iter()
        .find(|s| s.title == "DELETIONS BY PHASE")
        .unwrap();
    let details: Vec<_> = by_phase
        .entries
        .iter()
        .map(|e| (e.label.as_str(), e.detail.as_deref().unwrap_or_default()))
        .collect();
    assert_eq!(details, vec![("old_screen.xml", "phase 1"), ("old_row.xml", "phase 2")]);
}

#[test]
fn test_layout_view_binding_opt_in() {
    let project = layout_project();
    write(
        project.path(),
        &format!("{}/Settings.kt", SRC),
        "val binding = OldScreenBinding.inflate(inflater)\n",
    );
    let options = SweepOptions::new(project.path());

    let plain = run_tool(Tool::Layouts, &Config::default(), &options).unwrap();
    assert_eq!(plain.removed, 2);

    let mut config = Config::default();
    config.layouts.view_binding = true;
    let with_binding = run_tool(Tool::Layouts, &config, &options).unwrap();
    assert_eq!(with_binding.removed, 0);
}

#[test]
fn test_undo_script_restores_deleted_files() {
    let project = class_project();
    let script = project.path().join("undo.sh");
    let mut options = SweepOptions::new(project.path()).with_dry_run(false);
    options.undo_script = Some(script.clone());

    run_tool(Tool::Classes, &Config::default(), &options).unwrap();

    let contents = fs::read_to_string(&script).unwrap();
    assert!(contents.starts_with("#!/bin/bash"));
    assert!(contents.contains("OldFragment.kt"));
    assert!(contents.contains("class OldFragment : Fragment()"));
}

#[test]
fn test_excluded_glob_from_config() {
    let project = class_project();
    write(
        project.path(),
        "app/generated/Registry.kt",
        "val all = listOf(OldFragment())\n",
    );
    let options = SweepOptions::new(project.path());

    let outcome = run_tool(Tool::Classes, &Config::default(), &options).unwrap();
    assert_eq!(outcome.removed, 0);

    let mut config = Config::default();
    config.sources.exclude.push("**/generated/**".to_string());
    let outcome = run_tool(Tool::Classes, &config, &options).unwrap();
    assert_eq!(outcome.removed, 1);
}

#[test]
fn test_project_checked_out_under_test_dir() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("test").join("myapp");
    write(&root, &format!("{}/MainActivity.kt", SRC), "class MainActivity\n");
    write(&root, &format!("{}/OldFragment.kt", SRC), "class OldFragment\n");
    write(&root, &format!("{}/Nav.kt", SRC), "val start = MainActivity::class\n");

    let outcome = run_tool(Tool::Classes, &Config::default(), &SweepOptions::new(&root)).unwrap();

    assert_eq!(outcome.report.count("Total scanned"), Some(2));
    assert_eq!(section_labels(&outcome, "UNUSED Classes"), vec!["OldFragment.kt"]);
}
