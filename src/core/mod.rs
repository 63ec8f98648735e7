//! Core types shared by every component of the connector library.
//!
//! At the moment this is the error taxonomy:
//! - [`LoadError`] - a single document could not be loaded
//! - [`ScanError`] - the library directory could not be enumerated
//! - [`ResolveError`] - everything the resolution engine can return
//! - [`ErrorContext`] / [`user_friendly_error`] - CLI presentation of errors

pub mod error;

pub use error::{ErrorContext, LoadError, ResolveError, ScanError, user_friendly_error};

/// Result type returned by the resolution engine.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;
