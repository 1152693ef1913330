use crate::reference::Reference;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Skill configuration for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    /// References compiled into the agent document body
    #[serde(default)]
    pub precompiled: Vec<Reference>,
    /// References the agent may invoke on demand; listed, never bundled
    #[serde(default)]
    pub dynamic: Vec<Reference>,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            precompiled: Vec::new(),
            dynamic: Vec::new(),
        }
    }

    pub fn with_precompiled<R: Into<Reference>>(mut self, refs: impl IntoIterator<Item = R>) -> Self {
        self.precompiled.extend(refs.into_iter().map(Into::into));
        self
    }

    pub fn with_dynamic<R: Into<Reference>>(mut self, refs: impl IntoIterator<Item = R>) -> Self {
        self.dynamic.extend(refs.into_iter().map(Into::into));
        self
    }

    /// Reject names that cannot be used as a single path component
    pub fn validate_name(&self) -> Result<(), AgentSetError> {
        let name = self.name.as_str();
        if name.is_empty() || name.contains(&['/', '\\'][..]) || name == "." || name == ".." {
            return Err(AgentSetError::InvalidName(self.name.clone()));
        }
        Ok(())
    }
}

/// Agent set validation errors
#[derive(Debug, Error, PartialEq)]
pub enum AgentSetError {
    #[error("Agent '{0}' is configured more than once")]
    DuplicateAgent(String),

    #[error("Agent name '{0}' is not a valid file name")]
    InvalidName(String),
}

/// Ordered list of agents compiled in one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSet {
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

impl AgentSet {
    /// Reject duplicate names and names that cannot be used as an output file stem
    pub fn validate(&self) -> Result<(), AgentSetError> {
        let mut seen = HashSet::new();
        for agent in &self.agents {
            agent.validate_name()?;
            if !seen.insert(agent.name.as_str()) {
                return Err(AgentSetError::DuplicateAgent(agent.name.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
