// vigil/src/commands/mod.rs

pub mod check;
pub mod clean;
pub mod explore;
pub mod run;

use anyhow::Context;
use std::path::Path;
use vigil_core::infrastructure::config::ProjectWorkspace;

/// Shared first step of every command.
pub fn open_workspace(project_dir: &Path) -> anyhow::Result<ProjectWorkspace> {
    println!("⚙️  Loading configuration...");
    let workspace = ProjectWorkspace::open(project_dir).with_context(|| {
        format!(
            "Failed to load project configuration from {:?}",
            project_dir
        )
    })?;
    let config = workspace.config();
    println!("   Project: {} (v{})", config.name, config.version);
    Ok(workspace)
}
