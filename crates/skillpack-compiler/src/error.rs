//! Error types for agent compilation

use skillpack_skills::IndexError;
use skillpack_types::AgentSetError;
use std::path::PathBuf;
use thiserror::Error;

/// Run-level errors; nothing is compiled when one occurs
#[derive(Debug, Error)]
pub enum CompileError {
    /// The unit index could not be built
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// The agent set is inconsistent
    #[error("Configuration error: {0}")]
    Config(#[from] AgentSetError),
}

/// Agent definition errors; the agent is skipped
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// No directory for the agent
    #[error("Agent directory {0:?} not found")]
    NotFound(PathBuf),

    /// A required file is absent
    #[error("Required file {0:?} not found")]
    MissingFile(PathBuf),

    /// A file exists but could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `agent.yaml` does not have the expected shape
    #[error("Invalid agent manifest {path:?}: {source}")]
    Manifest {
        /// Manifest file
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_yaml::Error,
    },
}

/// Rendering a compiled document failed
#[derive(Debug, Error)]
pub enum RenderError {
    /// Frontmatter could not be serialized
    #[error("Failed to serialize frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}

/// Writing a compiled document failed; fatal for that agent's output
#[derive(Debug, Error)]
#[error("Failed to write {path:?}: {source}")]
pub struct WriteError {
    /// Output file
    pub path: PathBuf,
    /// Underlying I/O error
    #[source]
    pub source: std::io::Error,
}
