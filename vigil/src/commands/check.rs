// vigil/src/commands/check.rs
//
// USE CASE: Validate every input and report catalog smells.

use std::path::PathBuf;

use vigil_core::application::prepare_inputs;

use super::open_workspace;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let workspace = open_workspace(&project_dir)?;

    let inputs = match prepare_inputs(&workspace) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("❌ Check failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("✅ Business rules: {}", workspace.rules_path().display());
    println!(
        "✅ Product catalog: {} products, {} solutions",
        inputs.catalog.products.len(),
        inputs.catalog.solutions.len()
    );
    println!(
        "✅ Dataset: {} records, {} columns",
        inputs.records.len(),
        inputs.snapshot.columns().len()
    );

    let overlaps = inputs.catalog_overlaps();
    if overlaps.is_empty() {
        println!("✨ No catalog overlaps.");
    } else {
        println!("⚠️  {} catalog overlap(s), last entry wins:", overlaps.len());
        for overlap in overlaps {
            println!(
                "   - '{}' claimed by [{}] -> '{}'",
                overlap.key,
                overlap.claimed_by.join(", "),
                overlap.winner
            );
        }
    }
    Ok(())
}
