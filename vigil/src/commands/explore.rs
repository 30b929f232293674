// vigil/src/commands/explore.rs
//
// USE CASE: Profile the dataset without running the governance pipeline.

use std::path::PathBuf;

use comfy_table::{Table, presets::UTF8_FULL};
use vigil_core::application::prepare_inputs;
use vigil_core::domain::analysis::DataExplorer;

use super::open_workspace;

pub fn execute(project_dir: PathBuf) -> anyhow::Result<()> {
    let workspace = open_workspace(&project_dir)?;
    let inputs = match prepare_inputs(&workspace) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("❌ Exploration failed: {}", e);
            std::process::exit(1);
        }
    };

    let threshold = inputs.rules.analysis_rules.meaningful_correlation_threshold;
    let exploration = DataExplorer::run(&inputs.snapshot, threshold);

    println!(
        "\n🔬 {} rows x {} columns",
        exploration.row_count,
        exploration.columns.len()
    );

    let mut columns = Table::new();
    columns
        .load_preset(UTF8_FULL)
        .set_header(vec!["Column", "Null ratio", "Mean", "Std", "Min", "Max"]);
    for name in &exploration.columns {
        let null_ratio = exploration
            .null_ratio_by_column
            .get(name)
            .copied()
            .unwrap_or_default();
        let stats = match exploration.numeric_summary.get(name) {
            Some(s) => vec![
                format!("{:.4}", s.mean),
                format!("{:.4}", s.std),
                format!("{:.4}", s.min),
                format!("{:.4}", s.max),
            ],
            None => vec!["-".to_string(); 4],
        };
        let mut row = vec![name.clone(), format!("{:.2}", null_ratio)];
        row.extend(stats);
        columns.add_row(row);
    }
    println!("{columns}");

    println!("\n🔗 Correlations (|r| >= {})", threshold);
    if exploration.meaningful_correlations.is_empty() {
        println!("   None above threshold.");
        return Ok(());
    }
    let mut correlations = Table::new();
    correlations
        .load_preset(UTF8_FULL)
        .set_header(vec!["Column A", "Column B", "r"]);
    for c in &exploration.meaningful_correlations {
        correlations.add_row(vec![
            c.column_a.clone(),
            c.column_b.clone(),
            format!("{:.4}", c.coefficient),
        ]);
    }
    println!("{correlations}");
    Ok(())
}
