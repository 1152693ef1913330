//! Skillpack Types - Core types for the skillpack compiler
//!
//! This module defines the data model shared by the indexer, the resolver,
//! the assembler and the compiler driver.

pub mod agent;
pub mod document;
pub mod reference;
pub mod report;
pub mod unit;

pub use agent::{AgentConfig, AgentSet, AgentSetError};
pub use document::{AgentFrontmatter, CompiledDocument, FixedSections, ManifestEntry, Section, SectionKind};
pub use reference::{Reference, ResolvedSet};
pub use report::{AgentReport, CompileReport, IndexWarning, LoadFailure};
pub use unit::{Unit, UnitMetadata};
