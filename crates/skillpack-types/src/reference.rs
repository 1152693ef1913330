use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A skill reference as written in an agent configuration
///
/// Either an exact unit identifier (`category/name` or `category/name @owner`)
/// or a directory prefix (`category` or `category/subcategory`). Which one it
/// is gets decided at resolution time against a concrete index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference {
    raw: String,
}

impl Reference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The reference exactly as written
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Key used for exact lookup
    pub fn exact_key(&self) -> &str {
        self.raw.trim()
    }

    /// Directory prefix without trailing separators
    pub fn directory_prefix(&self) -> &str {
        self.raw.trim().trim_end_matches('/')
    }
}

impl From<&str> for Reference {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Reference {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Ordered set of unit identifiers; first occurrence wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSet {
    ids: Vec<String>,
    seen: HashSet<String>,
}

impl ResolvedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.seen.contains(&id) {
            return false;
        }
        self.seen.insert(id.clone());
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keep only identifiers matching `keep`, preserving order
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let seen = &mut self.seen;
        self.ids.retain(|id| {
            let kept = keep(id);
            if !kept {
                seen.remove(id);
            }
            kept
        });
    }
}

impl Serialize for ResolvedSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ids.serialize(serializer)
    }
}

impl<S: Into<String>> FromIterator<S> for ResolvedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
