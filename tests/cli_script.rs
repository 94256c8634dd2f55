mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;

use common::test_home;

fn shell(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("propflow_cli").unwrap();
    cmd.env("PROPFLOW_CLI_SCRIPT", "1")
        .env("PROPFLOW_HOME", home)
        .env("RUST_LOG", "off")
        .env_remove("PROPFLOW_API_BASE_URL");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = test_home();
    shell(&home)
        .write_stdin("dashboard\nexit\n")
        .assert()
        .success()
        .stdout(contains("Total received : $3,500.00"))
        .stdout(contains("4 selected firm(s) hidden."))
        .stdout(contains("Starter plan allows only 1 prop firm."));
}

#[test]
fn rejected_toggle_reports_the_upgrade_path() {
    let home = test_home();
    shell(&home)
        .write_stdin("toggle ftmo\nexit\n")
        .assert()
        .success()
        .stdout(contains("Upgrade to Standard for up to 3 firms."))
        .stdout(contains("plan set"));
}

#[test]
fn selection_survives_between_runs_only_after_save() {
    let home = test_home();
    shell(&home)
        .write_stdin("plan set premium\ntoggle ftmo\nexit\n")
        .assert()
        .success();
    shell(&home)
        .write_stdin("dashboard\nexit\n")
        .assert()
        .success()
        .stdout(contains("FTMO").not());

    shell(&home)
        .write_stdin("toggle ftmo\nsave\nexit\n")
        .assert()
        .success()
        .stdout(contains("Firm preferences saved."));
    shell(&home)
        .write_stdin("dashboard\nexit\n")
        .assert()
        .success()
        .stdout(contains("FTMO"));
}

#[test]
fn legacy_plan_names_are_accepted() {
    let home = test_home();
    shell(&home)
        .write_stdin("plan set pro\nplan\nexit\n")
        .assert()
        .success()
        .stdout(contains("Switched to the Premium plan."))
        .stdout(contains("Prop firms tracked: unlimited"));
}

#[test]
fn report_is_written_as_html() {
    let home = test_home();
    shell(&home)
        .write_stdin("report transactions 7d\nexit\n")
        .assert()
        .success()
        .stdout(contains("Transaction History report (Last 7 days) written to"));

    let name_pattern = Regex::new(r"^transactions-7d-\d{4}-\d{2}-\d{2}\.html$").unwrap();
    let files: Vec<_> = fs::read_dir(home.join("reports"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(name_pattern.is_match(&files[0]), "unexpected file {}", files[0]);
}

#[test]
fn locked_report_writes_nothing() {
    let home = test_home();
    shell(&home)
        .write_stdin("report detailed\nexit\n")
        .assert()
        .success()
        .stdout(contains("Detailed Analytics requires the Premium plan"));
    assert!(!home.join("reports").exists());
}

#[test]
fn unknown_command_offers_a_suggestion() {
    let home = test_home();
    shell(&home)
        .write_stdin("dashbord\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `dashbord`"))
        .stdout(contains("Suggestion: `dashboard`?"));
}

#[test]
fn unreachable_auth_upstream_reports_internal_error() {
    let home = test_home();
    shell(&home)
        .write_stdin("config set api_base_url http://127.0.0.1:9/api\nlogin a@b.c secret\nwhoami\nexit\n")
        .assert()
        .success()
        .stdout(contains("Internal server error"))
        .stdout(contains("Not signed in."));
}

#[test]
fn corrupt_firm_preferences_fall_back_silently() {
    use propflow_core::storage::{JsonStorage, KeyValueStore};

    let home = test_home();
    let storage = JsonStorage::new(Some(home.clone())).unwrap();
    storage.set("propflow-selected-firms", "{ not a list").unwrap();

    shell(&home)
        .write_stdin("firms\nexit\n")
        .assert()
        .success()
        .stdout(contains("FTMO"))
        .stdout(contains("unreadable").not())
        .stdout(contains("WARNING").not());
}
