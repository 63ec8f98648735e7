//! Resolution of ad-hoc libraries: inheritance, constants and failures.

use connector_lib::config::LibraryConfig;
use connector_lib::core::{LoadError, ResolveError, ScanError};
use connector_lib::document::Node;
use connector_lib::library::LibraryScanner;

use crate::common::{ConnectorFixture, init_test_logging};

const BASE: &str = r#"
translations:
  T:
    1: "ok"
"#;

fn scan(fixture: &ConnectorFixture) -> Result<connector_lib::library::Library, ResolveError> {
    init_test_logging(None);
    LibraryScanner::new(fixture.path()).scan()
}

fn strings(node: Option<&Node>) -> Vec<&str> {
    node.map(|n| n.elements().filter_map(Node::as_str).collect()).unwrap_or_default()
}

#[test]
fn test_object_arrays_are_appended() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("Base", &format!("{BASE}metrics:\n  - name: m1\n")).unwrap();
    fixture
        .connector(
            "Child",
            "X",
            "extends: [Base]\nconstants:\n  K: V\nmetrics:\n  - name: m2\nlabel: prefix-${constant::K}\n",
        )
        .unwrap();

    let library = scan(&fixture).unwrap();
    assert_eq!(library.ids().collect::<Vec<_>>(), vec!["Child"]);

    let child = library.get("Child").unwrap();
    assert_eq!(child.get_path(&["connector", "displayName"]).and_then(Node::as_str), Some("X"));
    assert_eq!(child.get_path(&["translations", "T", "1"]).and_then(Node::as_str), Some("ok"));

    let names: Vec<&str> = child
        .get("metrics")
        .unwrap()
        .elements()
        .filter_map(|metric| metric.get("name").and_then(Node::as_str))
        .collect();
    assert_eq!(names, vec!["m1", "m2"]);
    assert_eq!(child.get("label").and_then(Node::as_str), Some("prefix-V"));
}

#[test]
fn test_scalar_arrays_are_replaced() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("Base", &format!("{BASE}metrics: [m1]\n")).unwrap();
    fixture
        .connector(
            "Child",
            "X",
            "extends: [Base]\nconstants:\n  K: V\nmetrics: [m2]\nlabel: ${constant::K}\n",
        )
        .unwrap();

    let library = scan(&fixture).unwrap();
    let child = library.get("Child").unwrap();
    assert_eq!(strings(child.get("metrics")), vec!["m2"]);
    assert_eq!(child.get_path(&["translations", "T", "1"]).and_then(Node::as_str), Some("ok"));
    assert_eq!(child.get("label").and_then(Node::as_str), Some("V"));
}

#[test]
fn test_later_templates_override_earlier_ones() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("First", "value: first\nonly_first: 1\n").unwrap();
    fixture.template("Second", "value: second\n").unwrap();
    fixture.connector("Child", "Child", "extends: [First, Second]\n").unwrap();

    let library = scan(&fixture).unwrap();
    let child = library.get("Child").unwrap();
    assert_eq!(child.get("value").and_then(Node::as_str), Some("second"));
    assert_eq!(child.get("only_first"), Some(&Node::from(1_i64)));
}

#[test]
fn test_templates_in_sibling_directories() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.file("common/Shared.yaml", "shared: true\n").unwrap();
    fixture
        .file("vendor/Device.yaml", "extends: [../common/Shared]\nconnector:\n  displayName: Device\n")
        .unwrap();

    let library = scan(&fixture).unwrap();
    assert_eq!(library.get("Device").and_then(|d| d.get("shared")), Some(&Node::from(true)));
}

#[test]
fn test_constants_are_scoped_to_their_connector() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("Base", "oid: ${constant::OID}\n").unwrap();
    fixture.connector("A", "A", "extends: [Base]\nconstants:\n  OID: 1.1\n").unwrap();
    fixture.connector("B", "B", "extends: [Base]\nconstants:\n  OID: \"2.2\"\n").unwrap();

    let library = scan(&fixture).unwrap();
    // Scalar constants are substituted as text
    assert_eq!(library.get("A").and_then(|a| a.get("oid")).and_then(Node::as_str), Some("1.1"));
    assert_eq!(library.get("B").and_then(|b| b.get("oid")).and_then(Node::as_str), Some("2.2"));
}

#[test]
fn test_null_display_name_is_a_template() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("Abstract", "connector:\n  displayName: ~\n").unwrap();
    fixture.template("Plain", "metrics: [m]\n").unwrap();

    let library = scan(&fixture).unwrap();
    assert!(library.is_empty());
}

#[test]
fn test_custom_extension() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.file("Base.yml", "shared: 1\n").unwrap();
    fixture.file("Device.yml", "extends: [Base]\nconnector:\n  displayName: D\n").unwrap();
    fixture.connector("Ignored", "Ignored", "").unwrap();

    let scanner =
        LibraryScanner::with_config(fixture.path(), LibraryConfig::default().with_extension("yml"));
    let library = scanner.scan().unwrap();

    assert_eq!(library.ids().collect::<Vec<_>>(), vec!["Device"]);
    assert_eq!(library.get("Device").and_then(|d| d.get("shared")), Some(&Node::from(1_i64)));
}

#[test]
fn test_cycle_fails_the_scan() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("A", "extends: [B]\n").unwrap();
    fixture.template("B", "extends: [A]\n").unwrap();
    fixture.connector("Child", "Child", "extends: [A]\n").unwrap();

    let err = scan(&fixture).unwrap_err();
    assert!(err.is_cyclic());
    assert!(matches!(&err, ResolveError::Connector { id, .. } if id == "Child"));
    assert_eq!(err.root_cause().to_string(), "Circular extends detected: A → B → A");
}

#[test]
fn test_missing_template_fails_the_scan() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.connector("Child", "Child", "extends: [Nowhere]\n").unwrap();

    let err = scan(&fixture).unwrap_err();
    assert!(err.is_load_error());
    match err.root_cause() {
        ResolveError::Load(LoadError::NotFound { path }) => {
            assert_eq!(path, &fixture.path().join("Nowhere.yaml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_malformed_connector_fails_the_scan() {
    let fixture = ConnectorFixture::new().unwrap();
    fixture.connector("Good", "Good", "").unwrap();
    fixture.file("Broken.yaml", "connector: [unclosed\n").unwrap();

    let err = scan(&fixture).unwrap_err();
    assert!(matches!(err.root_cause(), ResolveError::Load(LoadError::Malformed { .. })));
    assert!(matches!(&err, ResolveError::Connector { id, .. } if id == "Broken"));
}

#[test]
fn test_missing_root_is_a_scan_error() {
    let fixture = ConnectorFixture::new().unwrap();
    let err = LibraryScanner::new(fixture.path().join("absent")).scan().unwrap_err();
    assert!(matches!(err, ResolveError::Scan(ScanError::RootNotFound { .. })));
}

#[test]
fn test_file_root_is_a_scan_error() {
    let fixture = ConnectorFixture::new().unwrap();
    let file = fixture.connector("Only", "Only", "").unwrap();
    let err = LibraryScanner::new(file).scan().unwrap_err();
    assert!(matches!(err, ResolveError::Scan(ScanError::NotADirectory { .. })));
}

#[tokio::test]
async fn test_concurrent_scan_reports_failures() {
    init_test_logging(None);
    let fixture = ConnectorFixture::new().unwrap();
    for i in 0..8 {
        fixture.connector(&format!("C{i}"), "C", "").unwrap();
    }
    fixture.connector("Bad", "Bad", "extends: [Nowhere]\n").unwrap();

    let err = LibraryScanner::new(fixture.path()).scan_concurrent().await.unwrap_err();
    assert!(err.is_load_error());
}

#[tokio::test]
async fn test_concurrent_scan_of_many_connectors() {
    init_test_logging(None);
    let fixture = ConnectorFixture::new().unwrap();
    fixture.template("Base", "metrics:\n  - name: base\n").unwrap();
    for i in 0..40 {
        fixture
            .connector(&format!("C{i:02}"), &format!("Connector {i}"), "extends: [Base]\nmetrics:\n  - name: own\n")
            .unwrap();
    }

    let scanner = LibraryScanner::with_config(
        fixture.path(),
        LibraryConfig {
            max_parallel: Some(4),
            ..LibraryConfig::default()
        },
    );
    let concurrent = scanner.scan_concurrent().await.unwrap();
    assert_eq!(concurrent.len(), 40);
    assert_eq!(concurrent, scanner.scan().unwrap());

    for (_, connector) in concurrent.iter() {
        assert_eq!(connector.get("metrics").map(Node::len), Some(2));
    }
}
