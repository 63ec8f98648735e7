//! Integration test suite for connector-lib
//!
//! End-to-end tests over real directories: the fixture library checked in
//! under `tests/fixtures/connector`, temporary libraries built per test, and
//! the command-line binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **library_scan**: scanning the fixture library, sequential and concurrent
//! - **resolution**: inheritance, constants and error cases on ad-hoc libraries
//! - **cli**: the `resolve`, `list` and `show` commands

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod library_scan;
mod resolution;
