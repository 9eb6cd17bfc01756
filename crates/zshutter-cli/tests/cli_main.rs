//! CLI tests for the zshutter binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn zshutter() -> Command {
    let mut cmd = Command::cargo_bin("zshutter").unwrap();
    cmd.env_remove("ZSHUTTER_PARAMETERS")
        .env_remove("ZSHUTTER_DEVICE_ID")
        .env_remove("ZSHUTTER_EVENT_CAPACITY")
        .env_remove("RUST_LOG");
    cmd
}

/// Test that the CLI binary exists and shows help.
#[test]
fn test_cli_help() {
    zshutter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("describe"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("action"))
        .stdout(predicate::str::contains("parameter"));
}

/// Test that the CLI shows version information.
#[test]
fn test_cli_version() {
    zshutter()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zshutter"));
}

/// Test that providing no subcommand shows an error.
#[test]
fn test_no_subcommand_shows_error() {
    // Clap's error code for a missing required subcommand
    zshutter().assert().failure().code(2);
}

#[test]
fn test_describe_lists_capabilities() {
    zshutter()
        .arg("describe")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"device_type\": \"ZMNHOD1\""))
        .stdout(predicate::str::contains("windowcoverings_state"))
        .stdout(predicate::str::contains("measure_temperature"))
        .stdout(predicate::str::contains("digital_temperature_sensor_reporting"));
}

#[test]
fn test_set_position() {
    zshutter()
        .args(["set", "dim.shutter", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"plan\": \"command\""))
        .stdout(predicate::str::contains("SWITCH_MULTILEVEL_SET"))
        .stdout(predicate::str::contains("\"value\": 50"));
}

#[test]
fn test_set_stop_publishes_idle() {
    zshutter()
        .args(["--device-id", "hall-blind", "set", "windowcoverings_state", "idle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"plan\": \"stop_level_change\""))
        .stdout(predicate::str::contains("\"value\": \"idle\""))
        .stdout(predicate::str::contains("hall-blind"));
}

#[test]
fn test_set_unknown_capability_fails() {
    zshutter()
        .args(["set", "measure_humidity", "0.5"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unknown capability: measure_humidity"));
}

#[test]
fn test_action_clamps_wire_value() {
    zshutter()
        .args(["action", "shutter_position", "150"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": 99"))
        .stdout(predicate::str::contains("\"value\": 1.5"));
}

#[test]
fn test_offline_action_reports_failure() {
    zshutter()
        .args(["--offline", "action", "slats_tilt", "40"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("CommandFailed"))
        .stdout(predicate::str::contains("\"value\": 0.4"));
}

#[test]
fn test_small_event_buffer_keeps_latest_events() {
    zshutter()
        .env("ZSHUTTER_EVENT_CAPACITY", "1")
        .args(["--offline", "action", "slats_tilt", "40"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("CommandFailed"));
}

#[test]
fn test_report_decodes_value() {
    zshutter()
        .args([
            "report",
            "measure_power",
            r#"{"kind":"meter","scale_bits_10":2,"value":12.5}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": 12.5"));
}

#[test]
fn test_parameter_frame() {
    zshutter()
        .args(["parameter", "all_on_all_off", "255"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"index\": 10"))
        .stdout(predicate::str::contains("\"size\": 2"));
}

#[test]
fn test_parameters_file_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"custom_delay": {{"index": 200, "size": 1}}}}"#).unwrap();

    zshutter()
        .arg("--parameters")
        .arg(file.path())
        .args(["parameter", "custom_delay", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"index\": 200"));

    zshutter()
        .arg("--parameters")
        .arg(file.path())
        .args(["parameter", "all_on_all_off", "1"])
        .assert()
        .failure();
}

#[test]
fn test_default_log_filter_hides_dispatch_logs() {
    zshutter()
        .args(["set", "dim.shutter", "0.5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("sending set command").not());
}

#[test]
fn test_verbose_enables_dispatch_logs() {
    zshutter()
        .args(["--verbose", "set", "dim.shutter", "0.5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("sending set command"));
}
