//! CLI integration tests
//!
//! These tests run the binary against throwaway projects.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app/src/main/java/MainActivity.kt", "class MainActivity\n");
    write(dir.path(), "app/src/main/java/OldFragment.kt", "class OldFragment\n");
    write(
        dir.path(),
        "app/src/main/res/layout/activity_main.xml",
        "<LinearLayout tools:context=\".MainActivity\" />\n",
    );
    dir
}

fn deadsweep() -> Command {
    let mut cmd = Command::cargo_bin("deadsweep").unwrap();
    cmd.env("NO_COLOR", "1").env("CLICOLOR", "0").env_remove("DEADSWEEP_DELETE");
    cmd
}

fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with(prefix))
                .unwrap_or(false)
        })
        .collect()
}

#[test]
fn test_help() {
    deadsweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classes"))
        .stdout(predicate::str::contains("strings"))
        .stdout(predicate::str::contains("--delete"));
}

#[test]
fn test_missing_subcommand_fails() {
    deadsweep().assert().failure();
}

#[test]
fn test_dry_run_by_default() {
    let project = project();

    deadsweep()
        .arg("--path")
        .arg(project.path())
        .arg("classes")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ 50%]"))
        .stdout(predicate::str::contains("Unused: OldFragment.kt (would delete)"))
        .stdout(predicate::str::contains("Report saved to:"))
        .stdout(predicate::str::contains("1 unused items found"));

    assert!(project.path().join("app/src/main/java/OldFragment.kt").exists());
    assert_eq!(files_with_prefix(project.path(), "classes_dryrun_report_").len(), 1);
}

#[test]
fn test_delete_with_json_report_dir() {
    let project = project();
    let reports = TempDir::new().unwrap();

    deadsweep()
        .arg("--path")
        .arg(project.path())
        .arg("--delete")
        .args(["--format", "json"])
        .arg("--report-dir")
        .arg(reports.path())
        .arg("classes")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 unused items removed"));

    assert!(!project.path().join("app/src/main/java/OldFragment.kt").exists());
    assert!(project.path().join("app/src/main/java/MainActivity.kt").exists());

    let written = files_with_prefix(reports.path(), "classes_deleted_report_");
    assert_eq!(written.len(), 1);
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(json["dry_run"], false);
    assert_eq!(json["tool"], "classes");
}

#[test]
fn test_delete_from_environment() {
    let project = project();

    deadsweep()
        .env("DEADSWEEP_DELETE", "1")
        .arg("-q")
        .arg("--path")
        .arg(project.path())
        .arg("classes")
        .assert()
        .success();

    assert!(!project.path().join("app/src/main/java/OldFragment.kt").exists());
}

#[test]
fn test_quiet_mode_prints_nothing() {
    let project = project();

    deadsweep()
        .args(["-q", "--path"])
        .arg(project.path())
        .arg("layouts")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_missing_base_strings_fails() {
    let project = project();

    deadsweep()
        .arg("--path")
        .arg(project.path())
        .arg("strings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Base resource file not found"));
}

#[test]
fn test_config_file_suffixes() {
    let project = project();
    write(project.path(), "app/src/main/java/LegacyScreen.kt", "class LegacyScreen\n");
    write(project.path(), ".deadsweep.yml", "classes:\n  suffixes: [Screen]\n");

    deadsweep()
        .arg("--path")
        .arg(project.path())
        .arg("classes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused: LegacyScreen.kt (would delete)"))
        .stdout(predicate::str::contains("OldFragment").not());
}

#[test]
fn test_undo_script_flag() {
    let project = project();
    let script = project.path().join("restore.sh");

    deadsweep()
        .arg("--path")
        .arg(project.path())
        .arg("--delete")
        .arg("--undo-script")
        .arg(&script)
        .arg("classes")
        .assert()
        .success();

    let contents = fs::read_to_string(&script).unwrap();
    assert!(contents.contains("class OldFragment"));
}

#[test]
fn test_all_runs_every_sweep() {
    let project = project();
    write(
        project.path(),
        "app/src/main/res/values/strings.xml",
        "<resources>\n    <string name=\"app_name\">Demo</string>\n</resources>\n",
    );

    deadsweep()
        .arg("--path")
        .arg(project.path())
        .arg("all")
        .assert()
        .success();

    assert_eq!(files_with_prefix(project.path(), "classes_dryrun_report_").len(), 1);
    assert_eq!(files_with_prefix(project.path(), "functions_dryrun_report_").len(), 1);
    assert_eq!(files_with_prefix(project.path(), "layouts_dryrun_report_").len(), 1);
    assert_eq!(
        files_with_prefix(&project.path().join("app/src/main/res"), "strings_dryrun_report_").len(),
        1
    );
}
