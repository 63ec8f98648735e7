//! Common test utilities for connector-lib integration tests
//!
//! Paths to the checked-in fixture library and helpers to run the binary.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;

pub use connector_lib::test_utils::{ConnectorFixture, init_test_logging};

/// Root of the fixture connector library shipped with the tests.
pub fn fixture_library() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("connector")
}

/// Path of a file inside the fixture library.
pub fn fixture_file(relative: &str) -> PathBuf {
    fixture_library().join(relative)
}

/// The `connector-lib` binary with logging kept out of the way.
///
/// `RUST_LOG` is cleared so a developer's environment cannot change what the
/// command writes to stderr.
pub fn connector_lib_cmd() -> Command {
    let mut cmd = Command::cargo_bin("connector-lib").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}
