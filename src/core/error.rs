//! Error handling for the connector library
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for the resolution engine, so callers can tell a
//!    broken template reference from a broken library root
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Taxonomy
//!
//! - [`LoadError`] - a connector or template file is missing, unreadable, or is
//!   not valid YAML. Fatal for the file being resolved.
//! - [`ScanError`] - the library root is missing, is not a directory, or the
//!   walk over it failed. Fatal for the whole scan.
//! - [`ResolveError`] - umbrella type returned by the engine entry points. It
//!   wraps the two above and adds [`ResolveError::CyclicExtends`] for templates
//!   that (transitively) extend themselves.
//!
//! Documents that parse but use a reserved key with an unexpected shape
//! (`extends` that is not a sequence, `constants` that is not a mapping) are not
//! errors: the feature is treated as absent.
//!
//! # Examples
//!
//! ```rust,no_run
//! use connector_lib::core::{ResolveError, user_friendly_error};
//!
//! fn report(error: ResolveError) {
//!     let ctx = user_friendly_error(anyhow::Error::from(error));
//!     ctx.display(); // colored error with details and suggestion
//! }
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single document could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file does not exist. For templates this usually means a typo in an
    /// `extends` entry.
    #[error("Connector file not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("Failed to read connector file: {}", path.display())]
    Unreadable {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML.
    #[error("Invalid YAML syntax in {}", path.display())]
    Malformed {
        /// Path of the file
        path: PathBuf,
        /// Parser failure, including line and column
        #[source]
        source: serde_yaml::Error,
    },
}

impl LoadError {
    /// Path of the document that failed to load.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::NotFound { path } | Self::Unreadable { path, .. } | Self::Malformed { path, .. } => {
                path
            }
        }
    }
}

/// The library directory could not be enumerated.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The library root does not exist.
    #[error("Connector directory does not exist: {}", path.display())]
    RootNotFound {
        /// Root that was requested
        path: PathBuf,
    },

    /// The library root is a file, not a directory.
    #[error("Connector directory is not a directory: {}", path.display())]
    NotADirectory {
        /// Root that was requested
        path: PathBuf,
    },

    /// Enumerating the directory tree failed.
    #[error("Failed to walk connector directory {}", path.display())]
    Walk {
        /// Root of the walk
        path: PathBuf,
        /// Failure reported by the walker
        #[source]
        source: walkdir::Error,
    },

    /// A concurrent resolution worker did not complete.
    #[error("Connector resolution task failed: {reason}")]
    Task {
        /// Why the worker failed (panic or cancellation)
        reason: String,
    },
}

/// Errors returned by the resolution engine.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A connector or template could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The library directory could not be enumerated.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A template extends itself, directly or through other templates.
    ///
    /// The chain lists identifiers from the outermost document to the repeated
    /// one, e.g. `A → B → A`.
    #[error("Circular extends detected: {chain}")]
    CyclicExtends {
        /// Rendered identifier chain
        chain: String,
    },

    /// Resolution of a specific connector failed during a scan.
    #[error("Failed to resolve connector '{id}'")]
    Connector {
        /// Identifier of the connector being resolved
        id: String,
        /// What went wrong
        #[source]
        source: Box<ResolveError>,
    },
}

impl ResolveError {
    /// Builds a [`ResolveError::CyclicExtends`] from the identifier chain.
    #[must_use]
    pub fn cyclic(chain: &[String]) -> Self {
        Self::CyclicExtends {
            chain: chain.join(" → "),
        }
    }

    /// Attaches the identifier of the connector being resolved.
    #[must_use]
    pub fn for_connector(self, id: impl Into<String>) -> Self {
        Self::Connector {
            id: id.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, looking through [`ResolveError::Connector`] wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Connector { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the innermost failure is a [`LoadError`].
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(self.root_cause(), Self::Load(_))
    }

    /// Whether the innermost failure is a [`ScanError`].
    #[must_use]
    pub fn is_scan_error(&self) -> bool {
        matches!(self.root_cause(), Self::Scan(_))
    }

    /// Whether the innermost failure is an extends cycle.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        matches!(self.root_cause(), Self::CyclicExtends { .. })
    }
}

/// User-facing error wrapper with optional details and suggestion.
///
/// # Examples
///
/// ```rust,no_run
/// use connector_lib::core::ErrorContext;
///
/// let context = ErrorContext::new("Connector directory does not exist: ./connectors")
///     .with_suggestion("Check the path passed to the command")
///     .with_details("The library root must be an existing directory");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// Main error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a context with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Adds an actionable suggestion, shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds details explaining the error, shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into a user-friendly [`ErrorContext`].
///
/// Engine errors get tailored suggestions; anything else is rendered with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = message_with_chain(&error);

    if let Some(resolve_error) = error.downcast_ref::<ResolveError>() {
        return resolve_error_context(resolve_error, message);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(message)
            .with_suggestion("Check file ownership and permissions of the connector directory");
    }

    if error.downcast_ref::<toml::de::Error>().is_some() {
        return ErrorContext::new(message)
            .with_suggestion("Check the TOML syntax of the configuration file")
            .with_details("Unknown keys and wrongly typed values are rejected");
    }

    ErrorContext::new(message)
}

fn resolve_error_context(error: &ResolveError, message: String) -> ErrorContext {
    match error.root_cause() {
        ResolveError::Load(LoadError::NotFound { path }) => ErrorContext::new(message)
            .with_suggestion(format!(
                "Check the 'extends' entries that reference '{}'; identifiers are file names without extension",
                path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default()
            ))
            .with_details("Templates are looked up in the directory of the file that extends them"),
        ResolveError::Load(LoadError::Malformed { .. }) => ErrorContext::new(message)
            .with_suggestion("Fix the YAML syntax; the parser reports the line and column above")
            .with_details("A connector that does not parse cannot be resolved"),
        ResolveError::Load(LoadError::Unreadable { .. }) => ErrorContext::new(message)
            .with_suggestion("Check that the file is readable by the current user"),
        ResolveError::Scan(ScanError::RootNotFound { .. } | ScanError::NotADirectory { .. }) => {
            ErrorContext::new(message)
                .with_suggestion("Pass the directory that contains the connector YAML files")
        }
        ResolveError::Scan(_) => ErrorContext::new(message)
            .with_suggestion("Retry with --verbose to see which entry failed"),
        ResolveError::CyclicExtends { .. } => ErrorContext::new(message)
            .with_suggestion("Remove one of the 'extends' entries that closes the loop")
            .with_details("A template cannot extend itself, directly or through other templates"),
        ResolveError::Connector { .. } => ErrorContext::new(message),
    }
}

fn message_with_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}
