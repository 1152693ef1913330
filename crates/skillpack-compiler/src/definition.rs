//! Agent definitions
//!
//! An agent named `N` lives in `<agents_dir>/N/`:
//!
//! - `agent.yaml`: description, tools, model, permission mode
//! - `intro.md`, `workflow.md`: required
//! - `critical-requirements.md`, `critical-reminders.md`, `examples.md`,
//!   `output-format.md`: optional, blank files count as absent

use serde::Deserialize;
use skillpack_types::AgentFrontmatter;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::DefinitionError;

const MANIFEST_FILE: &str = "agent.yaml";
const INTRO_FILE: &str = "intro.md";
const WORKFLOW_FILE: &str = "workflow.md";
const CRITICAL_REQUIREMENTS_FILE: &str = "critical-requirements.md";
const CRITICAL_REMINDERS_FILE: &str = "critical-reminders.md";
const EXAMPLES_FILE: &str = "examples.md";
const OUTPUT_FORMAT_FILE: &str = "output-format.md";

/// Contents of `agent.yaml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentManifest {
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub permission_mode: Option<String>,
}

/// The fixed, agent-specific content of a compiled document
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDefinition {
    pub name: String,
    pub manifest: AgentManifest,
    pub intro: String,
    pub workflow: String,
    pub critical_requirements: Option<String>,
    pub critical_reminders: Option<String>,
    pub examples: Option<String>,
    pub output_format: Option<String>,
}

impl AgentDefinition {
    /// Load the definition of agent `name` from `agents_dir`
    pub fn load(agents_dir: &Path, name: &str) -> Result<Self, DefinitionError> {
        let dir = agents_dir.join(name);
        if !dir.is_dir() {
            return Err(DefinitionError::NotFound(dir));
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        let raw_manifest = read_required(&manifest_path)?;
        let manifest: AgentManifest =
            serde_yaml::from_str(&raw_manifest).map_err(|source| DefinitionError::Manifest {
                path: manifest_path,
                source,
            })?;

        Ok(Self {
            name: name.to_string(),
            manifest,
            intro: read_required(&dir.join(INTRO_FILE))?,
            workflow: read_required(&dir.join(WORKFLOW_FILE))?,
            critical_requirements: read_optional(&dir.join(CRITICAL_REQUIREMENTS_FILE))?,
            critical_reminders: read_optional(&dir.join(CRITICAL_REMINDERS_FILE))?,
            examples: read_optional(&dir.join(EXAMPLES_FILE))?,
            output_format: read_optional(&dir.join(OUTPUT_FORMAT_FILE))?,
        })
    }

    /// Frontmatter for the compiled file
    pub fn frontmatter(&self) -> AgentFrontmatter {
        AgentFrontmatter {
            name: self.name.clone(),
            description: self.manifest.description.trim().to_string(),
            tools: self.manifest.tools.clone(),
            model: self.manifest.model.clone(),
            permission_mode: self.manifest.permission_mode.clone(),
        }
    }
}

fn read_required(path: &Path) -> Result<String, DefinitionError> {
    read_optional_raw(path)?.ok_or_else(|| DefinitionError::MissingFile(path.to_path_buf()))
}

fn read_optional(path: &Path) -> Result<Option<String>, DefinitionError> {
    Ok(read_optional_raw(path)?.filter(|text| !text.trim().is_empty()))
}

fn read_optional_raw(path: &Path) -> Result<Option<String>, DefinitionError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DefinitionError::Io {
            path: PathBuf::from(path),
            source,
        }),
    }
}
