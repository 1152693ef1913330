use anyhow::Context;
use serde::Deserialize;
use skillpack_logging::LogFormat;
use skillpack_types::AgentSet;
use std::env;
use std::path::{Path, PathBuf};

/// Built-in defaults, the lowest configuration layer
const DEFAULT_CONFIG: &str = r#"
[paths]
skills_dir = "src/skills"
agents_dir = "src/agents"
output_dir = ".claude/agents"
agents_file = "agents.toml"

[report]
path = ""  # Optional JSON report, e.g. "target/skillpack-report.json"

[logging]
level = "info"  # trace, debug, info, warn, error
format = "pretty"  # pretty or json
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    pub skills_dir: String,
    pub agents_dir: String,
    pub output_dir: String,
    pub agents_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub paths: PathsConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.skillpack/skillpack.toml
    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".skillpack").join("skillpack.toml"))
    }

    fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
    }

    /// Load configuration with layered approach:
    /// 1. Built-in defaults
    /// 2. Global config: ~/.skillpack/skillpack.toml (optional)
    /// 3. Local override: ./skillpack.toml (optional)
    /// 4. Environment variables (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let mut config_builder = Self::defaults();

        // Layer 2: Global config
        if let Some(global) = Self::global_config_path() {
            config_builder = config_builder.add_source(config::File::from(global).required(false));
        }

        config_builder = config_builder
            // Layer 3: Local workspace config
            .add_source(config::File::with_name("skillpack").required(false))
            // Layer 4: Environment variables with SKILLPACK__ prefix
            .add_source(config::Environment::with_prefix("SKILLPACK").separator("__"));

        // Convenience env var overrides
        for (var, key) in [
            ("SKILLPACK_SKILLS_DIR", "paths.skills_dir"),
            ("SKILLPACK_AGENTS_DIR", "paths.agents_dir"),
            ("SKILLPACK_OUTPUT_DIR", "paths.output_dir"),
            ("SKILLPACK_AGENTS_FILE", "paths.agents_file"),
            ("SKILLPACK_LOG_LEVEL", "logging.level"),
        ] {
            if let Ok(value) = env::var(var) {
                config_builder = config_builder.set_override(key, value)?;
            }
        }

        let config: Self = config_builder.build()?.try_deserialize()?;
        Ok(config)
    }

    pub fn skills_dir(&self) -> PathBuf {
        expand_path(&self.paths.skills_dir)
    }

    pub fn agents_dir(&self) -> PathBuf {
        expand_path(&self.paths.agents_dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        expand_path(&self.paths.output_dir)
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report
            .path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(expand_path)
    }

    /// Read the agent set from `paths.agents_file` (TOML, YAML or JSON)
    pub fn load_agents(&self) -> anyhow::Result<AgentSet> {
        load_agents(&expand_path(&self.paths.agents_file))
    }
}

/// Read an agent set file, format chosen by extension
pub fn load_agents(path: &Path) -> anyhow::Result<AgentSet> {
    let agents: AgentSet = config::Config::builder()
        .add_source(config::File::from(path))
        .build()
        .and_then(|c| c.try_deserialize::<AgentSet>())
        .with_context(|| format!("Failed to read agent configuration {:?}", path))?;
    Ok(agents)
}

/// Expand a leading `~` to the home directory
fn expand_path(raw: &str) -> PathBuf {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(raw.trim_start_matches('~').trim_start_matches('/'));
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config: Config = Config::defaults().build().unwrap().try_deserialize().unwrap();
        assert_eq!(config.paths.skills_dir, "src/skills");
        assert_eq!(config.output_dir(), PathBuf::from(".claude/agents"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.report_path().is_none());
    }

    #[test]
    fn test_local_layer_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("skillpack.toml");
        fs::write(&local, "[paths]\noutput_dir = \"build/agents\"\n\n[report]\npath = \"report.json\"\n").unwrap();

        let config: Config = Config::defaults()
            .add_source(config::File::from(local))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.output_dir(), PathBuf::from("build/agents"));
        assert_eq!(config.paths.agents_dir, "src/agents");
        assert_eq!(config.report_path(), Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("src/skills"), PathBuf::from("src/skills"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/skills"), home.join("skills"));
            assert_eq!(expand_path("~"), home);
        }
    }

    #[test]
    fn test_load_agents_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.toml");
        fs::write(
            &path,
            r#"
[[agents]]
name = "frontend-developer"
precompiled = ["methodology/universal", "frontend/react @vince"]
dynamic = ["frontend/testing @vince"]

[[agents]]
name = "pm"
precompiled = ["methodology"]
"#,
        )
        .unwrap();

        let agents = load_agents(&path).unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents.agents[0].name, "frontend-developer");
        assert_eq!(agents.agents[0].precompiled[1].raw(), "frontend/react @vince");
        assert!(agents.agents[1].dynamic.is_empty());
    }

    #[test]
    fn test_load_agents_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.yaml");
        fs::write(
            &path,
            "agents:\n  - name: pm\n    precompiled: [methodology/universal]\n",
        )
        .unwrap();

        let agents = load_agents(&path).unwrap();
        assert_eq!(agents.agents[0].precompiled[0].raw(), "methodology/universal");
    }

    #[test]
    fn test_load_agents_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_agents(&dir.path().join("missing.toml")).is_err());
    }
}
