// vigil/src/commands/clean.rs
//
// USE CASE: Clean build artifacts.

use std::path::PathBuf;

use vigil_core::application::clean_project;

use super::open_workspace;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let workspace = open_workspace(&project_dir)?;
    match clean_project(&workspace) {
        Ok(removed) if removed.is_empty() => println!("✨ Nothing to clean."),
        Ok(removed) => {
            for path in removed {
                println!("   🗑️  Artifact removed: {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("❌ Clean failed: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}
