//! Unit store index
//!
//! Built once per run by walking the skills root, then shared read-only by
//! the resolver and the loader. Iteration follows scan order, which is
//! sorted by file name and therefore stable across runs.

use indexmap::IndexMap;
use skillpack_types::IndexWarning;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::IndexError;
use crate::frontmatter;
use crate::unit::SKILL_FILE;

/// Index entry for one unit directory
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedUnit {
    /// Unique identifier
    pub id: String,
    /// Unit directory
    pub path: PathBuf,
    /// Frontmatter description, used for on-demand listings
    pub description: String,
}

/// Identifier → unit directory map in scan order
#[derive(Debug, Clone, Default)]
pub struct UnitIndex {
    units: IndexMap<String, IndexedUnit>,
    warnings: Vec<IndexWarning>,
}

/// Scan `root` and build the unit index
pub fn build_index(root: &Path) -> Result<UnitIndex, IndexError> {
    UnitIndex::build(root)
}

impl UnitIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` once and register every directory holding a `SKILL.md`
    pub fn build(root: &Path) -> Result<Self, IndexError> {
        if !root.is_dir() {
            return Err(IndexError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        info!("Indexing skills under {:?}", root);

        let mut index = Self::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(IndexError::Walk {
                        path: root.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    warn!("Skipping unreadable entry {:?}: {}", path, e);
                    index.warnings.push(IndexWarning {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() || entry.file_name() != SKILL_FILE {
                continue;
            }

            let skill_file = entry.path();
            let Some(unit_dir) = skill_file.parent() else {
                continue;
            };

            match frontmatter::read_header(skill_file) {
                Ok(header) => {
                    let id = identifier(root, unit_dir, header.name.trim());
                    debug!("Indexed unit '{}' at {:?}", id, unit_dir);
                    index.insert(IndexedUnit {
                        id,
                        path: unit_dir.to_path_buf(),
                        description: header.description.trim().to_string(),
                    })?;
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", skill_file, e);
                    index.warnings.push(IndexWarning {
                        path: skill_file.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Indexed {} units ({} skipped)",
            index.len(),
            index.warnings.len()
        );
        Ok(index)
    }

    /// Register a unit; a second directory claiming the same identifier is an error
    pub fn insert(&mut self, unit: IndexedUnit) -> Result<(), IndexError> {
        if let Some(existing) = self.units.get(&unit.id) {
            return Err(IndexError::Ambiguous {
                id: unit.id,
                first: existing.path.clone(),
                second: unit.path,
            });
        }
        self.units.insert(unit.id.clone(), unit);
        Ok(())
    }

    /// Look up a unit by exact identifier
    pub fn get(&self, id: &str) -> Option<&IndexedUnit> {
        self.units.get(id)
    }

    /// All identifiers, in scan order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// Identifiers strictly below the directory `prefix`, in scan order
    ///
    /// Matching is segment-aligned: `a/b` covers `a/b/c` but not `a/bc/d`.
    pub fn ids_under<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> {
        let needle = format!("{prefix}/");
        self.ids().filter(move |id| id.starts_with(&needle))
    }

    /// Units that were found but could not be registered
    pub fn warnings(&self) -> &[IndexWarning] {
        &self.warnings
    }

    /// Number of indexed units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the index holds no units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Parent path of the unit directory relative to the root, plus the declared name
fn identifier(root: &Path, unit_dir: &Path, name: &str) -> String {
    let parent = unit_dir
        .strip_prefix(root)
        .ok()
        .and_then(Path::parent)
        .map(|parent| {
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();

    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
