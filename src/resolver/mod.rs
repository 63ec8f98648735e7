//! Resolution pipeline for connector documents.
//!
//! A loaded document goes through an ordered chain of [`NodeProcessor`] stages.
//! The standard chain has two stages:
//!
//! 1. [`ExtendsProcessor`] - merges every template listed under `extends`
//! 2. [`ConstantsProcessor`] - substitutes `${constant::NAME}` placeholders
//!
//! Constants always run after inheritance, so substitutions see the fully
//! composed document (a template may use a constant that only the final
//! connector defines, and vice versa).
//!
//! # Examples
//!
//! ```rust,no_run
//! use connector_lib::resolver::Pipeline;
//! use std::path::Path;
//!
//! # fn example() -> connector_lib::core::Result<()> {
//! let pipeline = Pipeline::standard("yaml");
//! let connector = pipeline.resolve_file(Path::new("connectors/MIB2.yaml"))?;
//! println!("{}", serde_json::to_string_pretty(&connector).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod extends;
pub mod merge;

pub use constants::ConstantsProcessor;
pub use extends::ExtendsProcessor;
pub use merge::{merge, merge_into};

use std::path::Path;

use tracing::debug;

use crate::core::Result;
use crate::document::{Node, load_document};

/// Where the document being processed comes from.
#[derive(Debug, Clone, Copy)]
pub struct DocumentSource<'a> {
    /// Connector identifier (file name without extension)
    pub id: &'a str,
    /// Directory used to locate templates
    pub directory: &'a Path,
    /// Source file, when the document was loaded from disk
    pub path: Option<&'a Path>,
}

impl<'a> DocumentSource<'a> {
    /// Source for a document loaded from `path`.
    ///
    /// The identifier is the file name without its extension.
    #[must_use]
    pub fn from_path(path: &'a Path) -> Self {
        Self {
            id: path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default(),
            directory: path.parent().unwrap_or_else(|| Path::new(".")),
            path: Some(path),
        }
    }

    /// Source for an in-memory document whose templates live in `directory`.
    #[must_use]
    pub const fn in_directory(id: &'a str, directory: &'a Path) -> Self {
        Self {
            id,
            directory,
            path: None,
        }
    }
}

/// One transformation stage of the resolution pipeline.
///
/// Stages are stateless with respect to the documents they process, so a
/// single pipeline can be shared by concurrent workers.
pub trait NodeProcessor: Send + Sync {
    /// Short stage name used in logs.
    fn name(&self) -> &'static str;

    /// Transforms `node` and returns the result.
    ///
    /// # Errors
    ///
    /// Returns an error when the stage needs data it cannot obtain, such as a
    /// template file.
    fn process(&self, node: Node, source: &DocumentSource<'_>) -> Result<Node>;
}

/// Ordered chain of [`NodeProcessor`] stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn NodeProcessor>>,
}

impl Pipeline {
    /// An empty pipeline; documents pass through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard chain: extends, then constants.
    ///
    /// `extension` is appended to template identifiers (without the dot).
    #[must_use]
    pub fn standard(extension: &str) -> Self {
        Self::new().with_stage(ExtendsProcessor::new(extension)).with_stage(ConstantsProcessor)
    }

    /// Appends a stage to the end of the chain.
    #[must_use]
    pub fn with_stage(mut self, stage: impl NodeProcessor + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Names of the stages, in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs `node` through every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first stage error; later stages do not run.
    pub fn process(&self, node: Node, source: &DocumentSource<'_>) -> Result<Node> {
        self.stages.iter().try_fold(node, |node, stage| {
            debug!("Applying '{}' stage to '{}'", stage.name(), source.id);
            stage.process(node, source)
        })
    }

    /// Loads the file at `path` and runs it through the pipeline.
    ///
    /// Templates and final connectors are both accepted.
    ///
    /// # Errors
    ///
    /// Returns a load error for the file itself or any template it extends,
    /// or an extends cycle.
    pub fn resolve_file(&self, path: &Path) -> Result<Node> {
        let node = load_document(path)?;
        self.process(node, &DocumentSource::from_path(path))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("stages", &self.stage_names()).finish()
    }
}
