//! Error types for indexing and loading units

use std::path::PathBuf;
use thiserror::Error;

/// Frontmatter parsing and validation errors
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// File does not start with a `---` delimited block
    #[error("No valid YAML frontmatter found")]
    Missing,

    /// Frontmatter is not valid YAML or lacks required keys
    #[error("Failed to parse YAML frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Frontmatter parsed but violates naming rules
    #[error("{0}")]
    Invalid(String),

    /// Reading the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Index build errors; fatal to the whole run
#[derive(Debug, Error)]
pub enum IndexError {
    /// Skills root missing or not a directory
    #[error("Skills root {path:?} is not a directory")]
    RootNotFound {
        /// Configured root
        path: PathBuf,
    },

    /// Skills root could not be read
    #[error("Failed to read skills root {path:?}: {source}")]
    Walk {
        /// Configured root
        path: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// Two unit directories produce one identifier
    #[error("Ambiguous unit '{id}': defined at {first:?} and {second:?}")]
    Ambiguous {
        /// Shared identifier
        id: String,
        /// Directory registered first
        first: PathBuf,
        /// Directory that collided with it
        second: PathBuf,
    },
}

/// Why a unit failed to load
#[derive(Debug, Error)]
pub enum LoadCause {
    /// Identifier is not in the index
    #[error("unit is not indexed")]
    NotIndexed,

    /// A required file is absent
    #[error("{file:?} not found")]
    Missing {
        /// Expected file
        file: PathBuf,
    },

    /// A file exists but could not be read
    #[error("failed to read {file:?}: {source}")]
    Io {
        /// File being read
        file: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `SKILL.md` frontmatter is invalid
    #[error("invalid SKILL.md: {0}")]
    Frontmatter(#[source] FrontmatterError),

    /// `metadata.yaml` does not have the expected shape
    #[error("invalid metadata.yaml: {0}")]
    Metadata(#[source] serde_yaml::Error),
}

/// A unit could not be loaded; fatal for that unit only
#[derive(Debug, Error)]
#[error("Failed to load unit '{id}' from {path:?}: {cause}")]
pub struct LoadError {
    /// Identifier being loaded
    pub id: String,
    /// Unit directory
    pub path: PathBuf,
    /// Underlying cause
    #[source]
    pub cause: LoadCause,
}

impl LoadError {
    /// Create a load error for `id` at `path`
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, cause: LoadCause) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            cause,
        }
    }
}
