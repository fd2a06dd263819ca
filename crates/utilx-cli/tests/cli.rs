//! CLI integration tests run against the `utilx` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VANCOUVER: &str = "\
City of Vancouver vancouver.ca/utilitybilling
ACCT NUMBER: 310045
BILLING DATE: Apr 6, 2025
NAME: STRATA PLAN LMS 1234 ***
FOR SERVICE AT: 455 W 10TH AVE
BILLING PERIOD: Jan 1, 2025
TO: Mar 31, 2025
METER NO. CONSUMPTION AMOUNT
12345 188 UNITS 1,045.20
IF PAID ON OR BEFORE DUE DATE: $1,045.20";

const DIRECT_ENERGY: &str = "\
Direct Energy Business directenergy.com
Invoice Date: 05-Apr-25
NORTHSIDE HOLDINGS INC Product: Fixed Price Gas
Utility Account: 0045-771-220
Billing Period: March 2025
Total Usage (GJs): 48.25
Subtotal: $ 1,287.40";

fn utilx() -> Command {
    Command::cargo_bin("utilx").unwrap()
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_help_lists_commands() {
    utilx()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("process"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("providers"));
}

#[test]
fn test_providers_lists_all_issuers() {
    utilx()
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("bc_hydro"))
        .stdout(predicate::str::contains("City of Williams Lake"))
        .stdout(predicate::str::contains("creativeenergycanada.com"));
}

mod process {
    use super::*;

    #[test]
    fn test_json_to_stdout() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "bill.txt", VANCOUVER);

        let output = utilx().args(["process", &input]).output().unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["provider"], "city_of_vancouver");
        assert_eq!(json["records"][0]["account_number"], "310045");
        assert_eq!(json["records"][0]["usage_unit"], "m3");
        assert_eq!(json["records"][0]["charges"], "1045.20");
    }

    #[test]
    fn test_text_format() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "bill.txt", DIRECT_ENERGY);

        utilx()
            .args(["process", &input, "--format", "text"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Provider: Direct Energy"))
            .stdout(predicate::str::contains("Account: 0045-771-220"))
            .stdout(predicate::str::contains("Charges: $1,287.40"));
    }

    #[test]
    fn test_output_file() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "bill.txt", VANCOUVER);
        let out = dir.path().join("bill.json");

        utilx()
            .args(["process", &input, "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Output written to"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["records"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_forced_provider() {
        let dir = TempDir::new().unwrap();
        let text = VANCOUVER.replace("vancouver.ca/utilitybilling", "");
        let input = write_file(dir.path(), "bill.txt", &text);

        utilx()
            .args(["process", &input])
            .assert()
            .failure()
            .stderr(predicate::str::contains("bill provider not detected"));

        utilx()
            .args(["process", &input, "--provider", "city-of-vancouver"])
            .assert()
            .success()
            .stdout(predicate::str::contains("310045"));
    }

    #[test]
    fn test_unknown_provider_name() {
        let dir = TempDir::new().unwrap();
        let input = write_file(dir.path(), "bill.txt", VANCOUVER);

        utilx()
            .args(["process", &input, "--provider", "acme"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown provider: acme"));
    }

    #[test]
    fn test_missing_input_file() {
        utilx()
            .args(["process", "does-not-exist.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Input file not found"));
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let dir = TempDir::new().unwrap();
        let input = write_file(
            dir.path(),
            "bill.txt",
            "ACCT NUMBER: 310045\nvancouver.ca/utilitybilling",
        );

        utilx()
            .args(["process", &input, "--validate"])
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "record 1: missing period_start, period_end, consumption",
            ));
    }
}

mod batch {
    use super::*;

    #[test]
    fn test_writes_output_per_file_and_summary() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "vancouver.txt", VANCOUVER);
        write_file(dir.path(), "direct.txt", DIRECT_ENERGY);
        write_file(dir.path(), "notes.md", "not a bill");
        let out = dir.path().join("out");
        let pattern = format!("{}/*", dir.path().display());

        utilx()
            .args(["batch", &pattern, "--summary", "-j", "2", "-o"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Found 2 files"))
            .stdout(predicate::str::contains("2 records extracted"));

        assert!(out.join("vancouver.json").exists());
        assert!(out.join("direct.json").exists());

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
        let entries = summary.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e["status"] == "success"));
    }

    #[test]
    fn test_failure_stops_batch_unless_continuing() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "good.txt", VANCOUVER);
        write_file(dir.path(), "bad.txt", "no provider here");
        let pattern = format!("{}/*.txt", dir.path().display());

        utilx()
            .args(["batch", &pattern])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Processing failed"));

        utilx()
            .args(["batch", &pattern, "--continue-on-error"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Failed files:"))
            .stdout(predicate::str::contains("bad.txt"));
    }

    #[test]
    fn test_no_matching_files() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.txt", dir.path().display());

        utilx()
            .args(["batch", &pattern])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No matching files found"));
    }
}

mod config {
    use super::*;

    #[test]
    fn test_init_get_set() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("utilx").join("config.json");
        let path = path.to_string_lossy().into_owned();

        utilx()
            .args(["-c", &path, "config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created configuration file"));

        utilx()
            .args(["-c", &path, "config", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        utilx()
            .args(["-c", &path, "config", "get", "extraction.max_document_bytes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("4194304"));

        utilx()
            .args(["-c", &path, "config", "set", "extraction.force_provider", "enmax"])
            .assert()
            .success();

        utilx()
            .args(["-c", &path, "config", "get", "extraction.force_provider"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"enmax\""));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_string_lossy().into_owned();

        utilx()
            .args(["-c", &path, "config", "set", "extraction.force_provider", "acme"])
            .assert()
            .failure();

        utilx()
            .args(["-c", &path, "config", "set", "output.colour", "true"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration key not found"));
    }

    #[test]
    fn test_config_drives_output() {
        let dir = TempDir::new().unwrap();
        let config = write_file(
            dir.path(),
            "config.json",
            r#"{"output": {"pretty_json": false, "include_warnings": false}}"#,
        );
        let input = write_file(dir.path(), "bill.txt", VANCOUVER);

        let output = utilx()
            .args(["-c", &config, "process", &input])
            .output()
            .unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        assert_eq!(stdout.trim().lines().count(), 1);

        let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
        assert!(json.get("warnings").is_none());
    }
}
