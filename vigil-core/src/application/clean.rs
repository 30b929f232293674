// vigil-core/src/application/clean.rs

use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{info, instrument};

use crate::error::VigilError;
use crate::infrastructure::config::ProjectWorkspace;

/// Removes every configured clean target and returns what was deleted.
#[instrument(skip(workspace), fields(root = ?workspace.root()))]
pub fn clean_project(workspace: &ProjectWorkspace) -> Result<Vec<PathBuf>, VigilError> {
    info!("🧹 Initializing Vigil cleanup sequence...");

    let targets = workspace.config().targets_to_clean();

    let mut removed = Vec::new();
    for target_rel_path in &targets {
        // Zero-trust path traversal guard: relative, no `..`, inside the project.
        if !is_contained(target_rel_path) {
            return Err(VigilError::UnsafePath(target_rel_path.clone()));
        }
        let full_path = workspace.root().join(target_rel_path);

        if full_path.is_dir() {
            fs::remove_dir_all(&full_path)?;
        } else if full_path.exists() {
            fs::remove_file(&full_path)?;
        } else {
            continue;
        }
        info!(path = ?full_path, "Artifact removed");
        removed.push(full_path);
    }

    Ok(removed)
}

fn is_contained(relative: &str) -> bool {
    let path = Path::new(relative);
    !relative.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}
