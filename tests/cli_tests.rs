#![allow(clippy::unwrap_used)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ONE_EMPLOYEE: &str = "<company><employee empid=\"7\">\
    <firstname>Jane</firstname><lastname>Doe</lastname>\
    <nickname>JD</nickname><salary>50000</salary>\
    </employee></company>";

const EXPECTED: &str = "Name of the Root element:company\n\
    *****************************\n\
    \n Name of the current element :employee\n\
    Employee ID : 7\n\
    Employee First Name: Jane\n\
    Employee Last Name: Doe\n\
    Employee Nick Name: JD\n\
    Employee Salary: 50000\n";

fn empreport() -> Command {
    let mut cmd = Command::cargo_bin("empreport").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn reads_input_data_from_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("InputData.txt"), ONE_EMPLOYEE).unwrap();

    empreport()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn input_flag_overrides_default_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("staff.xml");
    fs::write(&path, ONE_EMPLOYEE).unwrap();

    empreport()
        .arg("--input")
        .arg(&path)
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn output_flag_writes_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("InputData.txt");
    let output = dir.path().join("report.txt");
    fs::write(&input, ONE_EMPLOYEE).unwrap();

    empreport()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(output).unwrap(), EXPECTED);
}

#[test]
fn missing_file_reports_diagnostic_and_exits_normally() {
    let dir = TempDir::new().unwrap();

    empreport()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("cannot open input file InputData.txt"));
}

#[test]
fn strict_mode_fails_on_malformed_xml() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("InputData.txt"), "<company><employee>").unwrap();

    empreport()
        .current_dir(dir.path())
        .arg("--strict")
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("cannot parse InputData.txt as XML"))
        .stderr(predicate::str::contains("unexpected end of input"));
}

#[test]
fn strict_mode_keeps_partial_report() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("InputData.txt"),
        "<company><employee empid=\"3\"><firstname>Al</firstname></employee></company>",
    )
    .unwrap();

    empreport()
        .current_dir(dir.path())
        .arg("--strict")
        .assert()
        .failure()
        .stdout(predicate::str::ends_with(
            "Employee ID : 3\nEmployee First Name: Al\n",
        ))
        .stderr(predicate::str::contains("has no <lastname> element"));
}

#[test]
fn missing_input_leaves_no_output_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.txt");

    empreport()
        .current_dir(dir.path())
        .arg("--strict")
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open input file"));

    assert!(!output.exists());
}

#[test]
fn malformed_input_keeps_existing_output_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.txt");
    fs::write(dir.path().join("InputData.txt"), "<company>").unwrap();
    fs::write(&output, "previous report\n").unwrap();

    empreport()
        .current_dir(dir.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(output).unwrap(), "previous report\n");
}

#[test]
fn max_depth_above_hard_limit_is_rejected() {
    empreport()
        .args(["--max-depth", "1000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be between 1 and 1024"));
}

#[test]
fn max_depth_zero_is_rejected() {
    empreport()
        .args(["--max-depth", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-depth"));
}
