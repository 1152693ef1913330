use crate::config::Config;
use anyhow::{bail, Context, Result};
use skillpack_compiler::{compile_all, CompileSettings};
use skillpack_types::CompileReport;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Compile service - runs one compile pass over the configured agents
pub struct CompileService {
    config: Config,
}

impl CompileService {
    /// Create a new compile service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the compile pass
    pub async fn run(self) -> Result<()> {
        // Initialize logging
        skillpack_logging::init_logging(&self.config.logging.level, self.config.logging.format)?;
        info!("Starting skillpack compile");

        let agents = self.config.load_agents()?;
        let skills_dir = self.config.skills_dir();
        let settings = CompileSettings {
            agents_dir: self.config.agents_dir(),
            output_dir: self.config.output_dir(),
        };

        info!(
            "Skills: {:?}, agents: {:?}, output: {:?}",
            skills_dir, settings.agents_dir, settings.output_dir
        );

        let report = compile_all(&skills_dir, settings, &agents)
            .await
            .context("Compilation aborted")?;

        log_report(&report);

        if let Some(path) = self.config.report_path() {
            write_report(&path, &report)?;
            info!("Report written to {:?}", path);
        }

        let failed: Vec<&str> = report.failed_agents().map(|a| a.name.as_str()).collect();
        if !failed.is_empty() {
            bail!(
                "{} agent(s) produced no output: {}",
                failed.len(),
                failed.join(", ")
            );
        }

        Ok(())
    }
}

/// Log everything that was skipped and why
fn log_report(report: &CompileReport) {
    for warning in &report.index_warnings {
        warn!("Skipped unit {:?}: {}", warning.path, warning.reason);
    }

    for agent in &report.agents {
        for reference in &agent.unresolved {
            warn!("{}: unresolved reference '{}'", agent.name, reference);
        }
        for failure in &agent.load_failures {
            warn!("{}: omitted '{}': {}", agent.name, failure.id, failure.cause);
        }
        match (&agent.output, &agent.error) {
            (_, Some(e)) => error!("{}: {}", agent.name, e),
            (Some(path), None) => info!(
                "{}: {} unit(s), {} invocable → {:?}",
                agent.name,
                agent.resolved_count.saturating_sub(agent.load_failures.len()),
                agent.dynamic_count,
                path
            ),
            (None, None) => {}
        }
    }

    if report.is_clean() {
        info!("All {} agent(s) compiled cleanly", report.agents.len());
    } else {
        warn!("Compiled with {} warning(s)", report.warning_count());
    }
}

/// Write the report as pretty JSON
fn write_report(path: &Path, report: &CompileReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json + "\n").with_context(|| format!("Failed to write report {:?}", path))?;
    Ok(())
}
