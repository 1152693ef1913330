//! Skillpack Compiler
//!
//! Composes agent definitions and resolved skill units into one compiled
//! document per agent.
//!
//! ## Pipeline
//!
//! 1. Index the skills root once ([`skillpack_skills::UnitIndex`])
//! 2. Per agent, resolve precompiled and dynamic references
//! 3. Load each precompiled unit; failures omit the unit and are reported
//! 4. Assemble fixed sections around the unit bodies
//! 5. Render and write `<output_dir>/<agent>.md`

pub mod assemble;
pub mod definition;
pub mod driver;
pub mod error;
pub mod render;

pub use assemble::{assemble, fixed_sections};
pub use definition::{AgentDefinition, AgentManifest};
pub use driver::{compile_all, CompileSettings, Compiler};
pub use error::{CompileError, DefinitionError, RenderError, WriteError};
pub use render::{MarkdownRenderer, Renderer};
