//! Compiler driver
//!
//! Runs resolve → load → assemble → render → write for every configured
//! agent. Agents are independent, so they compile concurrently on blocking
//! tasks sharing one read-only index. Problems are collected into the
//! `CompileReport`; only index and configuration errors abort the run.

use skillpack_skills::{load_indexed, resolve, UnitIndex};
use skillpack_types::{AgentConfig, AgentReport, AgentSet, CompileReport, LoadFailure, ManifestEntry};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::assemble::{assemble, fixed_sections};
use crate::definition::AgentDefinition;
use crate::error::{CompileError, WriteError};
use crate::render::{MarkdownRenderer, Renderer};

/// Where agent definitions are read and compiled files are written
#[derive(Debug, Clone, PartialEq)]
pub struct CompileSettings {
    pub agents_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Compiles agents against one unit index
#[derive(Clone)]
pub struct Compiler {
    index: Arc<UnitIndex>,
    settings: Arc<CompileSettings>,
    renderer: Arc<dyn Renderer>,
}

impl Compiler {
    /// Create a compiler rendering markdown
    pub fn new(index: UnitIndex, settings: CompileSettings) -> Self {
        Self {
            index: Arc::new(index),
            settings: Arc::new(settings),
            renderer: Arc::new(MarkdownRenderer),
        }
    }

    /// Build the index from `skills_dir` and create a compiler over it
    pub fn from_skills_dir(skills_dir: &Path, settings: CompileSettings) -> Result<Self, CompileError> {
        let index = UnitIndex::build(skills_dir)?;
        Ok(Self::new(index, settings))
    }

    /// Replace the renderer
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Compile a single agent on the current thread
    pub fn compile_agent(&self, agent: &AgentConfig) -> AgentReport {
        compile_one(&self.index, &self.settings, self.renderer.as_ref(), agent)
    }

    /// Compile every agent in `agents`
    ///
    /// Per-agent reports keep configuration order regardless of completion
    /// order.
    pub async fn compile_all(&self, agents: &AgentSet) -> Result<CompileReport, CompileError> {
        agents.validate()?;

        info!("Compiling {} agent(s)", agents.len());

        let mut tasks = JoinSet::new();
        for (position, agent) in agents.agents.iter().enumerate() {
            let index = Arc::clone(&self.index);
            let settings = Arc::clone(&self.settings);
            let renderer = Arc::clone(&self.renderer);
            let agent = agent.clone();

            tasks.spawn_blocking(move || {
                (position, compile_one(&index, &settings, renderer.as_ref(), &agent))
            });
        }

        let mut slots: Vec<Option<AgentReport>> = vec![None; agents.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, report)) => slots[position] = Some(report),
                Err(e) => error!("Agent compilation task failed: {}", e),
            }
        }

        let reports: Vec<AgentReport> = slots
            .into_iter()
            .zip(&agents.agents)
            .map(|(slot, agent)| {
                slot.unwrap_or_else(|| AgentReport::failed(&agent.name, "compilation task aborted"))
            })
            .collect();

        let report = CompileReport {
            index_warnings: self.index.warnings().to_vec(),
            agents: reports,
        };

        let written = report.agents.iter().filter(|a| a.has_output()).count();
        info!(
            "Compiled {}/{} agent(s), {} warning(s)",
            written,
            agents.len(),
            report.warning_count()
        );

        Ok(report)
    }
}

/// Build the index from `skills_dir` and compile every agent
pub async fn compile_all(
    skills_dir: &Path,
    settings: CompileSettings,
    agents: &AgentSet,
) -> Result<CompileReport, CompileError> {
    Compiler::from_skills_dir(skills_dir, settings)?
        .compile_all(agents)
        .await
}

fn compile_one(
    index: &UnitIndex,
    settings: &CompileSettings,
    renderer: &dyn Renderer,
    agent: &AgentConfig,
) -> AgentReport {
    if let Err(e) = agent.validate_name() {
        error!("Agent skipped: {}", e);
        return AgentReport::failed(&agent.name, e.to_string());
    }

    let mut report = AgentReport::new(&agent.name);

    let definition = match AgentDefinition::load(&settings.agents_dir, &agent.name) {
        Ok(definition) => definition,
        Err(e) => {
            error!("Agent '{}' skipped: {}", agent.name, e);
            report.error = Some(e.to_string());
            return report;
        }
    };

    let precompiled = resolve(&agent.precompiled, index);
    let mut dynamic = resolve(&agent.dynamic, index);
    dynamic.resolved.retain(|id| !precompiled.resolved.contains(id));

    for reference in precompiled.unresolved.iter().chain(&dynamic.unresolved) {
        warn!("Agent '{}': unresolved skill reference '{}'", agent.name, reference);
        report.unresolved.push(reference.raw().to_string());
    }

    let mut units = Vec::with_capacity(precompiled.resolved.len());
    for id in precompiled.resolved.iter() {
        match load_indexed(index, id) {
            Ok(unit) => units.push(unit),
            Err(e) => {
                warn!("Agent '{}': {}", agent.name, e);
                report.load_failures.push(LoadFailure {
                    id: id.to_string(),
                    cause: e.cause.to_string(),
                });
            }
        }
    }

    let invocable: Vec<ManifestEntry> = dynamic
        .resolved
        .iter()
        .filter_map(|id| index.get(id))
        .map(|unit| ManifestEntry {
            id: unit.id.clone(),
            description: unit.description.clone(),
        })
        .collect();

    report.resolved_count = precompiled.resolved.len();
    report.dynamic_count = invocable.len();

    let document = assemble(&units, &fixed_sections(&definition, &units, &invocable));

    let text = match renderer.render(&document) {
        Ok(text) => text,
        Err(e) => {
            error!("Agent '{}' could not be rendered: {}", agent.name, e);
            report.error = Some(e.to_string());
            return report;
        }
    };

    let path = settings
        .output_dir
        .join(format!("{}.{}", agent.name, renderer.extension()));
    match write_output(&path, &text) {
        Ok(()) => {
            debug!(
                "Agent '{}': {} unit(s) bundled, {} invocable",
                agent.name,
                units.len(),
                invocable.len()
            );
            info!("Compiled agent '{}' → {:?}", agent.name, path);
            report.output = Some(path);
        }
        Err(e) => {
            error!("Agent '{}': {}", agent.name, e);
            report.error = Some(e.to_string());
        }
    }

    report
}

/// Replace `path` with `text`, going through a sibling temp file so a
/// failed write never leaves a truncated document behind
fn write_output(path: &Path, text: &str) -> Result<(), WriteError> {
    let wrap = |source| WriteError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, text).map_err(wrap)?;
    fs::rename(&staging, path).map_err(|source| {
        let _ = fs::remove_file(&staging);
        wrap(source)
    })
}
