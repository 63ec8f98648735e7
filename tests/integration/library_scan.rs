//! Scans of the checked-in fixture library.
//!
//! The fixture holds one final connector, `snmp/MIB2.yaml`, built from three
//! templates spread over two directories, plus files the scanner must skip.

use connector_lib::config::LibraryConfig;
use connector_lib::document::Node;
use connector_lib::library::{ConnectorReader, EnterpriseManifest, LibraryScanner};

use crate::common::{fixture_file, fixture_library, init_test_logging};

fn text<'a>(node: &'a Node, path: &[&str]) -> Option<&'a str> {
    node.get_path(path).and_then(Node::as_str)
}

fn resolved_mib2() -> Node {
    init_test_logging(None);
    let library = LibraryScanner::new(fixture_library()).scan().unwrap();
    library.get("MIB2").cloned().unwrap()
}

#[test]
fn test_only_final_connectors_are_listed() {
    init_test_logging(None);
    let (library, stats) = LibraryScanner::new(fixture_library()).scan_with_stats().unwrap();

    assert_eq!(library.ids().collect::<Vec<_>>(), vec!["MIB2"]);
    assert_eq!(stats.connectors, 1);
    assert_eq!(stats.templates, 3);
    // README.md and the enterprise manifest
    assert_eq!(stats.skipped, 2);
}

#[test]
fn test_detection_criteria_are_appended_and_substituted() {
    let mib2 = resolved_mib2();
    let reader = ConnectorReader::new(&mib2);

    let criteria = reader.criteria();
    assert_eq!(criteria.len(), 2);
    assert_eq!(text(&criteria[0], &["type"]), Some("productRequirements"));
    assert_eq!(text(&criteria[1], &["type"]), Some("snmpGetNext"));
    assert_eq!(text(&criteria[1], &["oid"]), Some("1.3.6.1.2.1.2.2.1"));
    assert_eq!(reader.required_engine_version().as_deref(), Some("0.9.0"));
}

#[test]
fn test_scalar_lists_are_replaced_by_the_connector() {
    let mib2 = resolved_mib2();
    let reader = ConnectorReader::new(&mib2);

    assert_eq!(reader.tags(), vec!["hardware", "network"]);
    assert_eq!(reader.connection_types().into_iter().collect::<Vec<_>>(), vec!["remote"]);
    assert_eq!(reader.applies_to(), vec!["NT", "Linux"]);
}

#[test]
fn test_connector_section_combines_template_and_own_fields() {
    let mib2 = resolved_mib2();
    let reader = ConnectorReader::new(&mib2);

    assert_eq!(reader.display_name(), "MIB-2 Standard SNMP Agent - Network Interfaces");
    assert_eq!(
        reader.information_or(""),
        "Discovers the network interfaces of any SNMP agent implementing MIB-2"
    );
    assert_eq!(reader.relies_on_or(""), "MIB-2 standard SNMP Agent");
    assert_eq!(reader.platforms().into_iter().collect::<Vec<_>>(), vec!["Any platform"]);
}

#[test]
fn test_translation_tables_come_from_both_template_directories() {
    let mib2 = resolved_mib2();

    let port_type = mib2.get_path(&["translations", "PortTypeTranslationTable"]).unwrap();
    assert_eq!(text(port_type, &["7"]), Some("Ethernet"));
    assert_eq!(text(port_type, &["56"]), Some("FC Port"));

    let port_status = mib2.get_path(&["translations", "PortStatusTranslationTable"]).unwrap();
    assert_eq!(text(port_status, &["1"]), Some("ok"));
    assert_eq!(text(port_status, &["3"]), Some("degraded"));
    assert_eq!(text(port_status, &["7"]), Some("failed"));
}

#[test]
fn test_discovery_mapping_merges_template_attributes() {
    let mib2 = resolved_mib2();
    let discovery = mib2.get_path(&["monitors", "network", "discovery"]).unwrap();

    let attributes = discovery.get_path(&["mapping", "attributes"]).unwrap();
    assert_eq!(text(attributes, &["id"]), Some("$1"));
    assert_eq!(text(attributes, &["__display_id"]), Some("$7"));
    assert_eq!(text(attributes, &["physical_address"]), Some("$4"));
    assert_eq!(text(attributes, &["physical_address_type"]), Some("MAC"));
    assert_eq!(text(attributes, &["device_type"]), Some("$3"));
    assert_eq!(text(attributes, &["hw.parent.type"]), Some("enclosure"));
    assert_eq!(text(attributes, &["name"]), Some(r#"${awk::sprintf("%s (%s)", $7, $3)}"#));

    // Template source, with the connector's constant substituted
    assert_eq!(
        text(discovery, &["sources", "source(1)", "oid"]),
        Some("1.3.6.1.2.1.2.2.1")
    );
}

#[test]
fn test_collect_mapping() {
    let mib2 = resolved_mib2();
    let mapping = mib2.get_path(&["monitors", "network", "collect", "mapping"]).unwrap();

    assert_eq!(text(mapping, &["attributes", "id"]), Some("$1"));

    let metrics = mapping.get("metrics").unwrap();
    let expected = [
        (r#"hw.status{hw.type="network"}"#, "$4"),
        ("hw.network.up", "legacyLinkStatus($6)"),
        ("hw.network.bandwidth.limit", "megaBit2Bit($16)"),
        (r#"hw.errors{hw.type="network"}"#, "$10"),
        (r#"hw.network.packets{direction="receive"}"#, "$8"),
        (r#"hw.network.packets{direction="transmit"}"#, "$12"),
        (r#"hw.network.io{direction="receive"}"#, "$7"),
        (r#"hw.network.io{direction="transmit"}"#, "$11"),
    ];
    for (metric, value) in expected {
        assert_eq!(text(metrics, &[metric]), Some(value), "metric {metric}");
    }
}

#[test]
fn test_monitor_accessors() {
    let mib2 = resolved_mib2();
    let reader = ConnectorReader::new(&mib2);

    let monitors: Vec<(&str, &Node)> = reader.monitors().collect();
    assert_eq!(monitors.len(), 1);
    let (kind, network) = monitors[0];
    assert_eq!(kind, "network");

    let attributes = ConnectorReader::monitor_attributes(network);
    assert!(attributes.contains("hw.parent.type"));
    assert!(attributes.contains("name"));
    assert!(!attributes.contains("__display_id"));

    let metrics = ConnectorReader::monitor_metrics(network);
    assert_eq!(metrics.len(), 8);
    assert!(metrics.contains("hw.network.up"));
}

#[test]
fn test_extends_is_emptied_and_metric_definitions_inherited() {
    let mib2 = resolved_mib2();

    assert_eq!(mib2.get("extends"), Some(&Node::Sequence(Vec::new())));
    assert_eq!(text(&mib2, &["metrics", "hw.network.io", "unit"]), Some("By"));
}

#[test]
fn test_templates_resolve_on_their_own() {
    init_test_logging(None);
    let scanner = LibraryScanner::new(fixture_library());
    let header = scanner.resolve_file(&fixture_file("snmp/MIB2Header.yaml")).unwrap();

    // Placeholders stay when the document declares no constants
    assert_eq!(
        text(&header, &["monitors", "network", "discovery", "sources", "source(1)", "oid"]),
        Some("${constant::_IF_TABLE}")
    );
    assert_eq!(
        text(&header, &["connector", "information"]),
        Some("Hardware monitoring connector")
    );
    assert!(!connector_lib::library::is_final_connector(&header));
}

#[tokio::test]
async fn test_concurrent_scan_matches_sequential() {
    init_test_logging(None);
    let scanner = LibraryScanner::with_config(
        fixture_library(),
        LibraryConfig {
            max_parallel: Some(2),
            ..LibraryConfig::default()
        },
    );

    let sequential = scanner.scan().unwrap();
    let concurrent = scanner.scan_concurrent().await.unwrap();
    assert_eq!(sequential, concurrent);
}

#[test]
fn test_fixture_manifest_makes_mib2_a_community_connector() {
    let manifest = EnterpriseManifest::discover(
        &fixture_library(),
        connector_lib::constants::ENTERPRISE_MANIFEST_FILE,
    )
    .unwrap();

    assert!(manifest.is_enterprise("IpmiTool"));
    assert!(manifest.is_enterprise("Redfish"));
    assert!(!manifest.is_enterprise("MIB2"));

    let mib2 = resolved_mib2();
    let reader = ConnectorReader::new(&mib2);
    assert_eq!(
        reader.tags_with_category(manifest.is_enterprise("MIB2")),
        vec!["hardware", "network", "community"]
    );
}
