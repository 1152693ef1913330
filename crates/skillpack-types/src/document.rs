//! Compiled document model
//!
//! A `CompiledDocument` is an ordered list of sections. Fixed sections come
//! from the agent definition and are anchored either before or after all
//! unit sections; unit sections carry one unit body each.

use serde::{Deserialize, Serialize};

/// Frontmatter emitted at the top of a compiled agent file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFrontmatter {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(
        default,
        rename = "permissionMode",
        skip_serializing_if = "Option::is_none"
    )]
    pub permission_mode: Option<String>,
}

/// A unit the agent may invoke on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub description: String,
}

/// Kind of a section, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Frontmatter,
    Role,
    CriticalRequirements,
    SkillManifest,
    Workflow,
    Unit,
    Examples,
    OutputFormat,
    CriticalReminders,
}

/// One section of a compiled document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Frontmatter(AgentFrontmatter),
    Role { text: String },
    CriticalRequirements { text: String },
    SkillManifest {
        bundled: Vec<String>,
        dynamic: Vec<ManifestEntry>,
    },
    Workflow { text: String },
    Unit { id: String, body: String },
    Examples { text: String },
    OutputFormat { text: String },
    CriticalReminders { text: String },
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Frontmatter(_) => SectionKind::Frontmatter,
            Section::Role { .. } => SectionKind::Role,
            Section::CriticalRequirements { .. } => SectionKind::CriticalRequirements,
            Section::SkillManifest { .. } => SectionKind::SkillManifest,
            Section::Workflow { .. } => SectionKind::Workflow,
            Section::Unit { .. } => SectionKind::Unit,
            Section::Examples { .. } => SectionKind::Examples,
            Section::OutputFormat { .. } => SectionKind::OutputFormat,
            Section::CriticalReminders { .. } => SectionKind::CriticalReminders,
        }
    }
}

/// Fixed sections anchored around the unit bodies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedSections {
    pub preamble: Vec<Section>,
    pub closing: Vec<Section>,
}

impl FixedSections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor a section before all units
    pub fn before_units(mut self, section: Section) -> Self {
        self.preamble.push(section);
        self
    }

    /// Anchor a section after all units
    pub fn after_units(mut self, section: Section) -> Self {
        self.closing.push(section);
        self
    }
}

/// The assembled document for one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledDocument {
    pub sections: Vec<Section>,
}

impl CompiledDocument {
    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(Section::kind).collect()
    }

    /// Identifiers of the bundled unit sections, in document order
    pub fn unit_ids(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Unit { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn frontmatter(&self) -> Option<&AgentFrontmatter> {
        self.sections.iter().find_map(|section| match section {
            Section::Frontmatter(frontmatter) => Some(frontmatter),
            _ => None,
        })
    }
}
