use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_version() -> u32 {
    1
}

/// Structured metadata read from a unit's `metadata.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMetadata {
    pub category: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub usage_guidance: Option<String>,
}

/// A fully loaded content unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Globally unique identifier, e.g. `frontend/react @vince`
    pub id: String,
    /// Unit directory
    pub path: PathBuf,
    /// Description declared in the `SKILL.md` frontmatter
    pub description: String,
    /// `SKILL.md` content after the frontmatter
    pub body: String,
    pub metadata: UnitMetadata,
}
