use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn harlint_cmd() -> Command {
    Command::cargo_bin("harlint-cli").expect("binary should be built")
}

#[test]
fn clean_capture_exits_0() {
    harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .assert()
        .code(0);
}

#[test]
fn empty_capture_exits_0() {
    harlint_cmd()
        .arg(fixtures_dir().join("empty.har"))
        .assert()
        .code(0);
}

#[test]
fn capture_with_errors_exits_2() {
    harlint_cmd()
        .arg(fixtures_dir().join("page_with_eval.har"))
        .assert()
        .code(2);
}

#[test]
fn warn_level_configuration_exits_1() {
    harlint_cmd()
        .arg(fixtures_dir().join("eval_only.har"))
        .arg("--security-config")
        .arg(fixtures_dir().join("security_warn.json"))
        .assert()
        .code(1);
}

#[test]
fn json_output_is_valid() {
    let output = harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .output()
        .expect("command should run");

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");

    assert!(parsed.get("schema_version").is_some());
    assert!(parsed.get("tool").is_some());
    assert!(parsed.get("captures").is_some());
    assert!(parsed.get("pages").is_some());
    assert!(parsed.get("groups").is_some());
}

#[test]
fn json_reports_triggered_and_resolved_rules() {
    let output = harlint_cmd()
        .arg(fixtures_dir().join("page_with_eval.har"))
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let issues = &parsed["pages"][0]["report"]["issues"];

    assert_eq!(issues["no-eval"]["severity"], "error");
    assert_eq!(issues["no-debugger"]["severity"], "error");
    // Enabled but quiet: present as resolved with no sub-issues.
    assert_eq!(issues["no-script-url"]["severity"], "resolved");
    assert!(
        issues["no-script-url"]["sub_issues"]
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[test]
fn json_inventory_counts_are_consistent() {
    let output = harlint_cmd()
        .arg(fixtures_dir().join("page_with_eval.har"))
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let inventory = &parsed["pages"][0]["inventory"];

    let all = inventory["all_scripts"].as_array().unwrap().len();
    let files = inventory["script_files"].as_array().unwrap().len();
    let elements = inventory["script_elements"].as_array().unwrap().len();

    // One file script, one non-blank inline script; the blank one is dropped.
    assert_eq!(files, 1);
    assert_eq!(elements, 1);
    assert_eq!(all, files + elements);
    // The redirect consumes no index slot: html is 1, app.js is 2.
    assert_eq!(inventory["script_files"][0]["index"], 2);
    assert_eq!(inventory["script_elements"][0]["index"], 1);
}

#[test]
fn groups_accumulate_across_captures_of_the_same_host() {
    let output = harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .arg(fixtures_dir().join("eval_only.har"))
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let group = &parsed["groups"]["example.test"];

    assert_eq!(group["analyzed_data"].as_array().unwrap().len(), 2);
    assert_eq!(group["knowledge_data"].as_array().unwrap().len(), 2);
}

#[test]
fn group_flag_overrides_the_derived_label() {
    let output = harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .arg("--group")
        .arg("nightly-run")
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed["groups"].get("nightly-run").is_some());
    assert_eq!(parsed["pages"][0]["report"]["group"], "nightly-run");
}

#[test]
fn url_flag_overrides_the_derived_page_url() {
    let output = harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .arg("--url")
        .arg("https://override.test/page")
        .output()
        .expect("command should run");

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["pages"][0]["url"], "https://override.test/page");
    assert!(parsed["groups"].get("override.test").is_some());
}

#[test]
fn text_output_lists_triggered_rules() {
    harlint_cmd()
        .arg(fixtures_dir().join("page_with_eval.har"))
        .arg("--format")
        .arg("text")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("no-eval [error] (security)"))
        .stdout(predicate::str::contains("no-debugger [error] (standard)"));
}

#[test]
fn out_flag_writes_to_file() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let out_path = tmp.path().to_path_buf();

    harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .arg("--out")
        .arg(&out_path)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    let contents = std::fs::read_to_string(&out_path).expect("read output file");
    let parsed: serde_json::Value = serde_json::from_str(&contents).expect("file should be JSON");
    assert!(parsed.get("pages").is_some());
}

#[test]
fn missing_har_arg_fails() {
    harlint_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn nonexistent_file_fails() {
    harlint_cmd()
        .arg("/tmp/does_not_exist_harlint_test.har")
        .assert()
        .failure();
}

#[test]
fn invalid_har_document_fails_with_context() {
    let mut tmp = NamedTempFile::new().unwrap();
    use std::io::Write;
    tmp.write_all(b"not a har document").unwrap();
    tmp.flush().unwrap();

    harlint_cmd()
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode HAR document"));
}

#[test]
fn invalid_format_flag_fails() {
    harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .arg("--format")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn default_format_is_json() {
    let output = harlint_cmd()
        .arg(fixtures_dir().join("clean.har"))
        .output()
        .expect("command should run");

    serde_json::from_slice::<serde_json::Value>(&output.stdout)
        .expect("default output should be valid JSON");
}

#[test]
fn deterministic_json_across_runs() {
    let fixture = fixtures_dir().join("page_with_eval.har");

    let output_a = harlint_cmd().arg(&fixture).output().expect("first run");
    let output_b = harlint_cmd().arg(&fixture).output().expect("second run");

    assert_eq!(output_a.stdout, output_b.stdout);
}

#[test]
fn help_flag_prints_usage() {
    harlint_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Static JavaScript analysis over browser HAR captures",
        ));
}

#[test]
fn version_flag_prints_version() {
    harlint_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("harlint"));
}
