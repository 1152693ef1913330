//! End-to-end compilation over temporary skill and agent trees

#![allow(clippy::unwrap_used, clippy::expect_used)]

use skillpack_compiler::{
    compile_all, CompileError, CompileSettings, Compiler, RenderError, Renderer,
};
use skillpack_types::{AgentConfig, AgentSet, CompiledDocument};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CORE: &str = "methodology/universal/core-principles";
const INVESTIGATION: &str = "methodology/universal/investigation-requirements";
const WRITE_VERIFICATION: &str = "methodology/implementation/write-verification";
const REACT: &str = "frontend/react @vince";
const TESTING: &str = "frontend/testing @vince";

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            root: tempfile::tempdir().unwrap(),
        };
        workspace.unit("methodology/universal/core-principles", "core-principles", "methodology");
        workspace.unit(
            "methodology/universal/investigation-requirements",
            "investigation-requirements",
            "methodology",
        );
        workspace.unit(
            "methodology/implementation/write-verification",
            "write-verification",
            "methodology",
        );
        workspace.unit("frontend/react", "react @vince", "frontend");
        workspace.unit("frontend/testing", "testing @vince", "frontend");
        workspace.agent("frontend-developer");
        workspace.agent("pm");
        workspace
    }

    fn skills_dir(&self) -> std::path::PathBuf {
        self.root.path().join("skills")
    }

    fn settings(&self) -> CompileSettings {
        CompileSettings {
            agents_dir: self.root.path().join("agents"),
            output_dir: self.root.path().join("out"),
        }
    }

    fn unit(&self, dir: &str, name: &str, category: &str) {
        let dir = self.skills_dir().join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: Guidance for {name}\n---\n\nBODY[{name}]\n"),
        )
        .unwrap();
        fs::write(dir.join("metadata.yaml"), format!("category: {category}\n")).unwrap();
    }

    fn agent(&self, name: &str) {
        let dir = self.root.path().join("agents").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("agent.yaml"),
            format!("description: The {name} agent\ntools: [Read, Write]\n"),
        )
        .unwrap();
        fs::write(dir.join("intro.md"), format!("ROLE[{name}]\n")).unwrap();
        fs::write(dir.join("workflow.md"), "WORKFLOW\n").unwrap();
        fs::write(dir.join("critical-reminders.md"), "REMINDERS\n").unwrap();
    }

    fn output(&self, agent: &str) -> String {
        fs::read_to_string(self.root.path().join("out").join(format!("{agent}.md"))).unwrap()
    }

    fn compiler(&self) -> Compiler {
        Compiler::from_skills_dir(&self.skills_dir(), self.settings()).unwrap()
    }
}

fn agents(configs: Vec<AgentConfig>) -> AgentSet {
    AgentSet { agents: configs }
}

fn positions(text: &str, needles: &[&str]) -> Vec<usize> {
    needles
        .iter()
        .map(|needle| text.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
        .collect()
}

fn assert_increasing(values: &[usize]) {
    assert!(values.windows(2).all(|w| w[0] < w[1]), "out of order: {values:?}");
}

#[tokio::test]
async fn test_compiles_every_agent() {
    let workspace = Workspace::new();
    let set = agents(vec![
        AgentConfig::new("frontend-developer")
            .with_precompiled(["methodology/universal", REACT])
            .with_dynamic([TESTING]),
        AgentConfig::new("pm").with_precompiled(["methodology"]),
    ]);

    let report = compile_all(&workspace.skills_dir(), workspace.settings(), &set)
        .await
        .unwrap();

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.agents[0].name, "frontend-developer");
    assert_eq!(report.agents[0].resolved_count, 3);
    assert_eq!(report.agents[0].dynamic_count, 1);
    assert_eq!(report.agents[1].resolved_count, 3);

    let text = workspace.output("frontend-developer");
    assert!(text.starts_with("---\nname: frontend-developer\n"));
    assert_increasing(&positions(
        &text,
        &[
            "ROLE[frontend-developer]",
            "<preloaded_content>",
            "WORKFLOW",
            "BODY[core-principles]",
            "BODY[investigation-requirements]",
            "BODY[react @vince]",
            "REMINDERS",
        ],
    ));
    assert!(text.contains(&format!("- `{TESTING}`: Guidance for testing @vince")));
    assert!(!text.contains("BODY[testing @vince]"));
    assert!(!text.contains("BODY[write-verification]"));
}

#[tokio::test]
async fn test_load_failure_omits_unit_and_is_reported() {
    let workspace = Workspace::new();
    fs::remove_file(
        workspace
            .skills_dir()
            .join("methodology/universal/investigation-requirements/metadata.yaml"),
    )
    .unwrap();

    let set = agents(vec![AgentConfig::new("pm").with_precompiled([
        CORE,
        INVESTIGATION,
        WRITE_VERIFICATION,
    ])]);
    let report = workspace.compiler().compile_all(&set).await.unwrap();

    let pm = report.agent("pm").unwrap();
    assert!(pm.has_output());
    assert_eq!(pm.load_failures.len(), 1);
    assert_eq!(pm.load_failures[0].id, INVESTIGATION);
    assert!(pm.load_failures[0].cause.contains("metadata.yaml"));

    let text = workspace.output("pm");
    assert!(!text.contains("BODY[investigation-requirements]"));
    assert!(!text.contains(&format!("- {INVESTIGATION}")));
    assert_increasing(&positions(
        &text,
        &["ROLE[pm]", "BODY[core-principles]", "BODY[write-verification]", "REMINDERS"],
    ));
}

#[tokio::test]
async fn test_unresolved_references_do_not_stop_agent() {
    let workspace = Workspace::new();
    let set = agents(vec![AgentConfig::new("pm")
        .with_precompiled(["methodology/nonexistent", CORE])
        .with_dynamic(["frontend/typo"])]);

    let report = workspace.compiler().compile_all(&set).await.unwrap();
    let pm = report.agent("pm").unwrap();

    assert_eq!(pm.unresolved, vec!["methodology/nonexistent", "frontend/typo"]);
    assert_eq!(pm.resolved_count, 1);
    assert!(pm.has_output());
    assert_eq!(report.warning_count(), 2);
    assert!(workspace.output("pm").contains("BODY[core-principles]"));
}

#[tokio::test]
async fn test_dynamic_skips_precompiled_units() {
    let workspace = Workspace::new();
    let set = agents(vec![AgentConfig::new("frontend-developer")
        .with_precompiled([REACT])
        .with_dynamic(["frontend"])]);

    let report = workspace.compiler().compile_all(&set).await.unwrap();
    assert_eq!(report.agents[0].dynamic_count, 1);

    let text = workspace.output("frontend-developer");
    assert!(text.contains(&format!("- `{TESTING}`")));
    assert!(!text.contains(&format!("- `{REACT}`")));
}

#[tokio::test]
async fn test_recompiling_is_byte_identical() {
    let workspace = Workspace::new();
    let set = agents(vec![AgentConfig::new("pm").with_precompiled(["methodology", REACT])]);

    workspace.compiler().compile_all(&set).await.unwrap();
    let first = workspace.output("pm");
    workspace.compiler().compile_all(&set).await.unwrap();
    let second = workspace.output("pm");

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_previous_output_is_overwritten() {
    let workspace = Workspace::new();
    let out = workspace.root.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("pm.md"), "stale content from an earlier run").unwrap();

    let set = agents(vec![AgentConfig::new("pm").with_precompiled([CORE])]);
    workspace.compiler().compile_all(&set).await.unwrap();

    assert!(!workspace.output("pm").contains("stale"));
}

#[tokio::test]
async fn test_ambiguous_index_aborts_before_compiling() {
    let workspace = Workspace::new();
    workspace.unit("frontend/react-copy", "react @vince", "frontend");

    let set = agents(vec![AgentConfig::new("pm").with_precompiled([CORE])]);
    let result = compile_all(&workspace.skills_dir(), workspace.settings(), &set).await;

    assert!(matches!(result, Err(CompileError::Index(_))));
    assert!(!workspace.root.path().join("out").exists());
}

#[tokio::test]
async fn test_missing_definition_fails_only_that_agent() {
    let workspace = Workspace::new();
    let set = agents(vec![
        AgentConfig::new("ghost").with_precompiled([CORE]),
        AgentConfig::new("pm").with_precompiled([CORE]),
    ]);

    let report = workspace.compiler().compile_all(&set).await.unwrap();

    let failed: Vec<_> = report.failed_agents().map(|a| a.name.as_str()).collect();
    assert_eq!(failed, vec!["ghost"]);
    assert!(report.agent("ghost").unwrap().error.is_some());
    assert!(report.agent("pm").unwrap().has_output());
}

#[tokio::test]
async fn test_unwritable_output_fails_only_that_agent() {
    let workspace = Workspace::new();
    let out = workspace.root.path().join("out");
    fs::create_dir_all(out.join("pm.md")).unwrap();

    let set = agents(vec![
        AgentConfig::new("pm").with_precompiled([CORE]),
        AgentConfig::new("frontend-developer").with_precompiled([REACT]),
    ]);
    let report = workspace.compiler().compile_all(&set).await.unwrap();

    assert!(report.agent("pm").unwrap().error.is_some());
    assert!(report.agent("frontend-developer").unwrap().has_output());
}

#[tokio::test]
async fn test_duplicate_agents_rejected() {
    let workspace = Workspace::new();
    let set = agents(vec![AgentConfig::new("pm"), AgentConfig::new("pm")]);

    let result = workspace.compiler().compile_all(&set).await;
    assert!(matches!(result, Err(CompileError::Config(_))));
}

#[tokio::test]
async fn test_index_warnings_surface_in_report() {
    let workspace = Workspace::new();
    let broken = workspace.skills_dir().join("backend/broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("SKILL.md"), "no frontmatter here\n").unwrap();

    let set = agents(vec![AgentConfig::new("pm").with_precompiled([CORE])]);
    let report = workspace.compiler().compile_all(&set).await.unwrap();

    assert_eq!(report.index_warnings.len(), 1);
    assert!(!report.is_clean());
    assert!(report.agent("pm").unwrap().is_clean());
}

struct IdListRenderer;

impl Renderer for IdListRenderer {
    fn render(&self, document: &CompiledDocument) -> Result<String, RenderError> {
        Ok(document.unit_ids().join("\n"))
    }

    fn extension(&self) -> &str {
        "txt"
    }
}

#[tokio::test]
async fn test_custom_renderer() {
    let workspace = Workspace::new();
    let set = agents(vec![AgentConfig::new("pm").with_precompiled(["methodology/universal"])]);

    let report = workspace
        .compiler()
        .with_renderer(IdListRenderer)
        .compile_all(&set)
        .await
        .unwrap();

    let output = report.agents[0].output.clone().unwrap();
    assert!(output.ends_with(Path::new("pm.txt")));
    assert_eq!(
        fs::read_to_string(output).unwrap(),
        format!("{CORE}\n{INVESTIGATION}")
    );
}

/// Panics while rendering the named agent
struct PanickingRenderer(&'static str);

impl Renderer for PanickingRenderer {
    fn render(&self, document: &CompiledDocument) -> Result<String, RenderError> {
        let name = document.frontmatter().map(|f| f.name.as_str());
        if name == Some(self.0) {
            panic!("renderer failed for {}", self.0);
        }
        Ok(document.unit_ids().join("\n"))
    }
}

#[tokio::test]
async fn test_panicking_agent_fails_only_that_agent() {
    let workspace = Workspace::new();
    let set = agents(vec![
        AgentConfig::new("pm").with_precompiled([CORE]),
        AgentConfig::new("frontend-developer").with_precompiled([REACT]),
    ]);

    let report = workspace
        .compiler()
        .with_renderer(PanickingRenderer("pm"))
        .compile_all(&set)
        .await
        .unwrap();

    let pm = report.agent("pm").unwrap();
    assert_eq!(pm.error.as_deref(), Some("compilation task aborted"));
    assert!(!pm.has_output());
    assert_eq!(report.agents[1].name, "frontend-developer");
    assert!(report.agents[1].has_output());
    assert_eq!(workspace.output("frontend-developer"), REACT);
}
