//! Composition of fixed sections and unit bodies into one document

use skillpack_types::{CompiledDocument, FixedSections, ManifestEntry, Section, Unit};

use crate::definition::AgentDefinition;

/// Lay out `fixed.preamble`, one section per unit in the given order, then `fixed.closing`
///
/// Units are never reordered and fixed sections never land between units.
pub fn assemble(units: &[Unit], fixed: &FixedSections) -> CompiledDocument {
    let mut sections = Vec::with_capacity(fixed.preamble.len() + units.len() + fixed.closing.len());

    sections.extend(fixed.preamble.iter().cloned());
    sections.extend(units.iter().map(|unit| Section::Unit {
        id: unit.id.clone(),
        body: unit.body.clone(),
    }));
    sections.extend(fixed.closing.iter().cloned());

    CompiledDocument { sections }
}

/// Fixed sections of an agent in pipeline order
///
/// Preamble: frontmatter, role, critical requirements, skill manifest,
/// workflow. Closing: examples, output format, critical reminders.
/// `bundled` must be the units that actually loaded so the manifest never
/// lists a unit the document lacks.
pub fn fixed_sections(
    definition: &AgentDefinition,
    bundled: &[Unit],
    dynamic: &[ManifestEntry],
) -> FixedSections {
    let mut fixed = FixedSections::new()
        .before_units(Section::Frontmatter(definition.frontmatter()))
        .before_units(Section::Role {
            text: definition.intro.clone(),
        });

    if let Some(text) = &definition.critical_requirements {
        fixed = fixed.before_units(Section::CriticalRequirements { text: text.clone() });
    }

    fixed = fixed
        .before_units(Section::SkillManifest {
            bundled: bundled.iter().map(|unit| unit.id.clone()).collect(),
            dynamic: dynamic.to_vec(),
        })
        .before_units(Section::Workflow {
            text: definition.workflow.clone(),
        });

    if let Some(text) = &definition.examples {
        fixed = fixed.after_units(Section::Examples { text: text.clone() });
    }
    if let Some(text) = &definition.output_format {
        fixed = fixed.after_units(Section::OutputFormat { text: text.clone() });
    }
    if let Some(text) = &definition.critical_reminders {
        fixed = fixed.after_units(Section::CriticalReminders { text: text.clone() });
    }

    fixed
}
