//! Command-line tests running the `connector-lib` binary.

use predicates::prelude::*;
use serde_json::Value;

use crate::common::{ConnectorFixture, connector_lib_cmd, fixture_file, fixture_library};

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_resolve_prints_library_as_json() {
    let output = connector_lib_cmd()
        .arg("resolve")
        .arg(fixture_library())
        .assert()
        .success()
        .get_output()
        .clone();

    let library = stdout_json(&output);
    let mib2 = &library["MIB2"];
    assert_eq!(
        mib2["connector"]["displayName"],
        "MIB-2 Standard SNMP Agent - Network Interfaces"
    );
    assert_eq!(mib2["connector"]["detection"]["criteria"][1]["oid"], "1.3.6.1.2.1.2.2.1");
    assert_eq!(mib2["translations"]["PortStatusTranslationTable"]["7"], "failed");
    assert!(library.get("MIB2Header").is_none());
}

#[test]
fn test_resolve_parallel_matches_sequential() {
    let sequential =
        connector_lib_cmd().arg("resolve").arg(fixture_library()).assert().success().get_output().clone();
    let parallel = connector_lib_cmd()
        .args(["resolve", "--parallel"])
        .arg(fixture_library())
        .assert()
        .success()
        .get_output()
        .clone();

    assert_eq!(stdout_json(&sequential), stdout_json(&parallel));
}

#[test]
fn test_resolve_yaml_output() {
    connector_lib_cmd()
        .arg("resolve")
        .arg(fixture_library())
        .args(["--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MIB2:"))
        .stdout(predicate::str::contains("extends: []"));
}

#[test]
fn test_resolve_missing_directory() {
    let fixture = ConnectorFixture::new().unwrap();
    connector_lib_cmd()
        .arg("resolve")
        .arg(fixture.path().join("absent"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("Connector directory does not exist"));
}

#[test]
fn test_resolve_cycle_is_reported() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("A", "extends: [B]\n").unwrap();
    fixture.template("B", "extends: [A]\n").unwrap();
    fixture.connector("Child", "Child", "extends: [A]\n").unwrap();

    connector_lib_cmd()
        .arg("resolve")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to resolve connector 'Child'"))
        .stderr(predicate::str::contains("Circular extends detected: A → B → A"));
}

#[test]
fn test_invalid_format() {
    connector_lib_cmd()
        .arg("resolve")
        .arg(fixture_library())
        .args(["--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format 'xml'"));
}

#[test]
fn test_list_json_shows_category() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.connector("Ipmi", "IPMI", "").unwrap();
    fixture.connector("MIB2", "MIB-2", "").unwrap();
    fixture.enterprise_manifest(&["Ipmi"]).unwrap();

    let output = connector_lib_cmd()
        .arg("list")
        .arg(fixture.path())
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .clone();

    let rows = stdout_json(&output);
    assert_eq!(rows[0]["id"], "Ipmi");
    assert_eq!(rows[0]["displayName"], "IPMI");
    assert_eq!(rows[0]["category"], "enterprise");
    assert_eq!(rows[1]["id"], "MIB2");
    assert_eq!(rows[1]["category"], "community");
}

#[test]
fn test_list_table() {
    connector_lib_cmd()
        .arg("list")
        .arg(fixture_library())
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("MIB-2 Standard SNMP Agent"))
        .stdout(predicate::str::contains("community"))
        .stdout(predicate::str::contains("1 connectors"));
}

#[test]
fn test_show_template_as_yaml() {
    connector_lib_cmd()
        .arg("show")
        .arg(fixture_file("snmp/MIB2Header.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("PortStatusTranslationTable"))
        .stdout(predicate::str::contains("hw.parent.type: enclosure"));
}

#[test]
fn test_show_missing_file() {
    connector_lib_cmd()
        .arg("show")
        .arg(fixture_file("snmp/Missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Connector file not found"));
}

#[test]
fn test_config_file_changes_extension() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.file("Device.yml", "connector:\n  displayName: Device\n").unwrap();
    fixture.connector("Other", "Other", "").unwrap();
    let config = fixture.file("connector-lib.toml", "extension = \"yml\"\n").unwrap();

    let output = connector_lib_cmd()
        .arg("--config")
        .arg(&config)
        .arg("resolve")
        .arg(fixture.path())
        .assert()
        .success()
        .get_output()
        .clone();

    let library = stdout_json(&output);
    assert!(library.get("Device").is_some());
    assert!(library.get("Other").is_none());
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let fixture = ConnectorFixture::new().unwrap();
    let config = fixture.file("connector-lib.toml", "extensions = \"yml\"\n").unwrap();

    connector_lib_cmd()
        .arg("--config")
        .arg(&config)
        .arg("resolve")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));
}
