//! Rendering of compiled documents to text

use skillpack_types::{CompiledDocument, ManifestEntry, Section};

use crate::error::RenderError;

/// Turns a compiled document into the text written to disk
///
/// Implementations must be pure: the same document always renders to the
/// same text.
pub trait Renderer: Send + Sync {
    /// Render `document`
    fn render(&self, document: &CompiledDocument) -> Result<String, RenderError>;

    /// Output file extension, without the dot
    fn extension(&self) -> &str {
        "md"
    }
}

/// Markdown agent file with YAML frontmatter and tagged sections
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, document: &CompiledDocument) -> Result<String, RenderError> {
        let mut blocks = Vec::with_capacity(document.sections.len());

        for section in &document.sections {
            let block = match section {
                Section::Frontmatter(frontmatter) => {
                    format!("---\n{}---", serde_yaml::to_string(frontmatter)?)
                }
                Section::Role { text } => tagged("role", text),
                Section::CriticalRequirements { text } => tagged("critical_requirements", text),
                Section::SkillManifest { bundled, dynamic } => {
                    tagged("preloaded_content", &manifest(bundled, dynamic))
                }
                Section::Workflow { text } => tagged("workflow", text),
                Section::Unit { id, body } => {
                    format!(
                        "<skill id=\"{}\">\n{}\n</skill>",
                        id.replace('"', "&quot;"),
                        body.trim()
                    )
                }
                Section::Examples { text } => tagged("examples", text),
                Section::OutputFormat { text } => tagged("output_format", text),
                Section::CriticalReminders { text } => tagged("critical_reminders", text),
            };
            blocks.push(block);
        }

        let mut output = blocks.join("\n\n");
        output.push('\n');
        Ok(output)
    }
}

fn tagged(tag: &str, text: &str) -> String {
    format!("<{tag}>\n{}\n</{tag}>", text.trim())
}

fn manifest(bundled: &[String], dynamic: &[ManifestEntry]) -> String {
    let mut text = String::new();

    if bundled.is_empty() {
        text.push_str("No skills are preloaded into this agent.");
    } else {
        text.push_str(
            "The following skills are already in your context below. Do not read them from the filesystem:\n",
        );
        for id in bundled {
            text.push_str(&format!("\n- {id}"));
        }
    }

    if !dynamic.is_empty() {
        text.push_str("\n\nSkills to invoke when needed:\n");
        for entry in dynamic {
            text.push_str(&format!("\n- `{}`: {}", entry.id, entry.description));
        }
    }

    text
}
