//! Reference resolution
//!
//! Each reference is classified once against the index: an exact identifier
//! wins over a directory interpretation, a directory expands to every unit
//! below it, anything else is unresolved. Expansion results are merged into
//! one ordered set where the first occurrence of an identifier fixes its
//! position.

use skillpack_types::{Reference, ResolvedSet};
use tracing::debug;

use crate::index::UnitIndex;

/// How a single reference was interpreted against an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedReference<'a> {
    /// The reference names one unit
    Exact(&'a str),
    /// The reference names a directory holding the listed units
    Directory {
        /// Normalized directory prefix
        prefix: String,
        /// Units below the prefix, in index order
        matches: Vec<&'a str>,
    },
    /// Neither an identifier nor a non-empty directory
    Unresolved,
}

/// Result of resolving a reference list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Unique identifiers, first occurrence order
    pub resolved: ResolvedSet,
    /// References that matched nothing, as written
    pub unresolved: Vec<Reference>,
}

/// Classify one reference against `index`
pub fn classify<'a>(reference: &Reference, index: &'a UnitIndex) -> ResolvedReference<'a> {
    if let Some(unit) = index.get(reference.exact_key()) {
        return ResolvedReference::Exact(unit.id.as_str());
    }

    let prefix = reference.directory_prefix();
    if prefix.is_empty() {
        return ResolvedReference::Unresolved;
    }

    let matches: Vec<&str> = index.ids_under(prefix).collect();
    if matches.is_empty() {
        ResolvedReference::Unresolved
    } else {
        ResolvedReference::Directory {
            prefix: prefix.to_string(),
            matches,
        }
    }
}

/// Expand `references` into an ordered, deduplicated identifier set
///
/// Unresolvable references are collected, never fatal.
pub fn resolve(references: &[Reference], index: &UnitIndex) -> Resolution {
    let mut resolution = Resolution::default();

    for reference in references {
        let classified = classify(reference, index);
        match &classified {
            ResolvedReference::Unresolved => {
                debug!("Reference '{}' matched no unit", reference);
                resolution.unresolved.push(reference.clone());
            }
            ResolvedReference::Exact(id) => {
                debug!("Reference '{}' is exact", reference);
                resolution.resolved.insert(*id);
            }
            ResolvedReference::Directory { prefix, matches } => {
                debug!(
                    "Reference '{}' expands directory '{}' to {} units",
                    reference,
                    prefix,
                    matches.len()
                );
                for id in matches {
                    resolution.resolved.insert(*id);
                }
            }
        }
    }

    resolution
}
