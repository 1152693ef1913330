use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A unit directory the indexer could not register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexWarning {
    pub path: PathBuf,
    pub reason: String,
}

/// A resolved unit that could not be loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub id: String,
    pub cause: String,
}

/// Outcome of compiling one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub name: String,
    /// Distinct units resolved from precompiled references
    pub resolved_count: usize,
    /// Units declared as invocable on demand
    pub dynamic_count: usize,
    /// References that matched nothing, verbatim
    pub unresolved: Vec<String>,
    pub load_failures: Vec<LoadFailure>,
    /// Written output file
    pub output: Option<PathBuf>,
    /// Agent-level failure (definition, render or write)
    pub error: Option<String>,
}

impl AgentReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolved_count: 0,
            dynamic_count: 0,
            unresolved: Vec::new(),
            load_failures: Vec::new(),
            output: None,
            error: None,
        }
    }

    /// Agent-level failure report
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        let mut report = Self::new(name);
        report.error = Some(error.into());
        report
    }

    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.load_failures.is_empty() && self.error.is_none()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

/// Summary of a whole compile run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileReport {
    pub index_warnings: Vec<IndexWarning>,
    /// Per-agent reports, in configuration order
    pub agents: Vec<AgentReport>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.index_warnings.is_empty() && self.agents.iter().all(AgentReport::is_clean)
    }

    /// Agents that produced no output
    pub fn failed_agents(&self) -> impl Iterator<Item = &AgentReport> {
        self.agents.iter().filter(|agent| !agent.has_output())
    }

    /// Non-fatal problems: index warnings, unresolved references and load failures
    pub fn warning_count(&self) -> usize {
        self.index_warnings.len()
            + self
                .agents
                .iter()
                .map(|agent| agent.unresolved.len() + agent.load_failures.len())
                .sum::<usize>()
    }

    pub fn agent(&self, name: &str) -> Option<&AgentReport> {
        self.agents.iter().find(|agent| agent.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut ok = AgentReport::new("pm");
        ok.output = Some(PathBuf::from("out/pm.md"));

        let mut partial = AgentReport::new("frontend");
        partial.output = Some(PathBuf::from("out/frontend.md"));
        partial.unresolved.push("methodology/nonexistent".to_string());
        partial.load_failures.push(LoadFailure {
            id: "frontend/react @vince".to_string(),
            cause: "metadata.yaml missing".to_string(),
        });

        let failed = AgentReport::failed("backend", "intro.md missing");

        let report = CompileReport {
            index_warnings: vec![],
            agents: vec![ok, partial, failed],
        };

        assert!(!report.is_clean());
        assert_eq!(report.warning_count(), 2);
        let failed: Vec<_> = report.failed_agents().map(|a| a.name.as_str()).collect();
        assert_eq!(failed, vec!["backend"]);
        assert!(report.agent("pm").is_some_and(AgentReport::is_clean));
    }
}
