//! Unit loading
//!
//! Each unit is a folder containing `SKILL.md` with YAML frontmatter and a
//! `metadata.yaml` next to it.

use skillpack_types::{Unit, UnitMetadata};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{LoadCause, LoadError};
use crate::frontmatter;
use crate::index::UnitIndex;

/// Body file of a unit
pub const SKILL_FILE: &str = "SKILL.md";
/// Structured metadata file of a unit
pub const METADATA_FILE: &str = "metadata.yaml";

/// Read the body and metadata of the unit `id` stored at `path`
pub fn load(id: &str, path: &Path) -> Result<Unit, LoadError> {
    let fail = |cause| LoadError::new(id, path, cause);

    let content = read(&path.join(SKILL_FILE)).map_err(fail)?;
    let (header, body) = frontmatter::parse_document(&content)
        .map_err(|e| fail(LoadCause::Frontmatter(e)))?;

    let raw_metadata = read(&path.join(METADATA_FILE)).map_err(fail)?;
    let metadata: UnitMetadata = serde_yaml::from_str(&raw_metadata)
        .map_err(|e| fail(LoadCause::Metadata(e)))?;

    debug!("Loaded unit '{}' ({} bytes)", id, body.len());

    Ok(Unit {
        id: id.to_string(),
        path: path.to_path_buf(),
        description: header.description.trim().to_string(),
        body,
        metadata,
    })
}

/// Load a unit by identifier through the index
pub fn load_indexed(index: &UnitIndex, id: &str) -> Result<Unit, LoadError> {
    let unit = index
        .get(id)
        .ok_or_else(|| LoadError::new(id, PathBuf::new(), LoadCause::NotIndexed))?;
    load(&unit.id, &unit.path)
}

fn read(file: &Path) -> Result<String, LoadCause> {
    fs::read_to_string(file).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LoadCause::Missing {
                file: file.to_path_buf(),
            }
        } else {
            LoadCause::Io {
                file: file.to_path_buf(),
                source,
            }
        }
    })
}
