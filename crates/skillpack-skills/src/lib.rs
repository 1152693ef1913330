//! Skillpack Skills
//!
//! Everything between a content root on disk and a list of loaded units:
//!
//! - [`index`]: scan the skills root once and map unit identifiers to directories
//! - [`resolve`]: expand exact and directory-prefix references against an index
//! - [`unit`]: read a unit's `SKILL.md` body and `metadata.yaml`
//!
//! A unit is a directory holding `SKILL.md` (YAML frontmatter with `name` and
//! `description`, then the body) and `metadata.yaml`. Its identifier is the
//! parent directory path relative to the root plus the declared name, e.g.
//! `frontend/react @vince` for `frontend/react/SKILL.md` declaring
//! `name: react @vince`.

#![deny(unsafe_code, unused_imports, unused_variables, dead_code, missing_docs)]

pub mod error;
pub mod frontmatter;
pub mod index;
pub mod resolve;
pub mod unit;

pub use error::{FrontmatterError, IndexError, LoadCause, LoadError};
pub use index::{build_index, IndexedUnit, UnitIndex};
pub use resolve::{classify, resolve, Resolution, ResolvedReference};
pub use unit::{load, load_indexed};
