//! `SKILL.md` frontmatter parsing
//!
//! The indexer only needs the header, so [`read_header`] stops at the closing
//! delimiter. The loader parses the whole document with [`parse_document`].

use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

use crate::error::FrontmatterError;

/// Maximum allowed name length, owner qualifier excluded
const MAX_NAME_LENGTH: usize = 64;
/// Maximum allowed description length
const MAX_DESCRIPTION_LENGTH: usize = 1024;

#[allow(clippy::unwrap_used)]
static DOCUMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^---[ \t]*\r?\n([\s\S]*?)\r?\n---[ \t]*(?:\r?\n([\s\S]*))?$").unwrap()
});

#[allow(clippy::unwrap_used)]
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*( @[A-Za-z0-9_.-]+)?$").unwrap());

/// Header of a `SKILL.md` file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillFrontmatter {
    /// Declared name, optionally owner-qualified (`react @vince`)
    pub name: String,
    /// What the unit covers and when to use it
    pub description: String,
}

/// Read and validate only the frontmatter of the file at `path`
pub fn read_header(path: &Path) -> Result<SkillFrontmatter, FrontmatterError> {
    let mut lines = BufReader::new(File::open(path)?).lines();

    let first = lines.next().transpose()?;
    if !first.as_deref().is_some_and(is_delimiter) {
        return Err(FrontmatterError::Missing);
    }

    let mut yaml = String::new();
    for line in lines {
        let line = line?;
        if is_delimiter(&line) {
            let frontmatter: SkillFrontmatter = serde_yaml::from_str(&yaml)?;
            validate(&frontmatter)?;
            return Ok(frontmatter);
        }
        yaml.push_str(&line);
        yaml.push('\n');
    }

    Err(FrontmatterError::Missing)
}

/// Split a full `SKILL.md` document into validated frontmatter and body
pub fn parse_document(content: &str) -> Result<(SkillFrontmatter, String), FrontmatterError> {
    let captures = DOCUMENT_PATTERN
        .captures(content)
        .ok_or(FrontmatterError::Missing)?;

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    let frontmatter: SkillFrontmatter = serde_yaml::from_str(yaml)?;
    validate(&frontmatter)?;

    Ok((frontmatter, body.to_string()))
}

/// Validate declared name and description
pub fn validate(frontmatter: &SkillFrontmatter) -> Result<(), FrontmatterError> {
    let name = frontmatter.name.trim();
    if name.is_empty() {
        return Err(FrontmatterError::Invalid("Skill name cannot be empty".into()));
    }

    if !NAME_PATTERN.is_match(name) {
        return Err(FrontmatterError::Invalid(format!(
            "Skill name '{name}' must be lowercase letters, numbers and hyphens, optionally followed by ' @owner'"
        )));
    }

    let base = name.split(" @").next().unwrap_or(name);
    if base.len() > MAX_NAME_LENGTH {
        warn!(
            "Skill name '{}' exceeds {} characters (was {})",
            name,
            MAX_NAME_LENGTH,
            base.len()
        );
    }

    if frontmatter.description.trim().is_empty() {
        return Err(FrontmatterError::Invalid(format!(
            "Skill '{name}' description cannot be empty"
        )));
    }

    if frontmatter.description.len() > MAX_DESCRIPTION_LENGTH {
        warn!(
            "Skill '{}' description exceeds {} characters (was {})",
            name,
            MAX_DESCRIPTION_LENGTH,
            frontmatter.description.len()
        );
    }

    Ok(())
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == "---"
}
