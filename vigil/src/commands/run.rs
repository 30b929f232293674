// vigil/src/commands/run.rs
//
// USE CASE: Run the full analysis and write the report artifacts.

use std::path::PathBuf;

use anyhow::Context;
use vigil_core::application::{ReportFormat, ReportWriter, run_analysis};
use vigil_core::infrastructure::template::JinjaRenderer;
use vigil_core::ports::NarrativeCapability;

use super::open_workspace;

pub async fn execute(project_dir: PathBuf, format: ReportFormat, offline: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    tracing::debug!(?format, offline, "Run requested");

    // A. Load the Config (Infra)
    let workspace = open_workspace(&project_dir)?;
    let config = workspace.config();

    // B. Resolve the narrative capability
    let narrative = if offline {
        NarrativeCapability::unavailable("offline mode was requested")
    } else {
        NarrativeCapability::from_env(&config.narrative)
    };
    match &narrative {
        NarrativeCapability::Available { .. } => println!("   Narrative: Azure OpenAI 🧠"),
        NarrativeCapability::Unavailable { reason } => {
            println!("   Narrative: deterministic fallback ({})", reason)
        }
    }

    // C. Run the Analysis (Application Layer)
    let report =
        match run_analysis(&workspace, &narrative, config.narrative.summary_max_chars).await {
            Ok(report) => report,
            Err(e) => {
                eprintln!("\n💥 CRITICAL ANALYSIS ERROR: {}", e);
                std::process::exit(1);
            }
        };

    // D. Artifacts
    let renderer = JinjaRenderer::new();
    let target_dir = workspace.target_dir();
    let written = ReportWriter::new(&target_dir, &renderer)
        .write(format, &config.name, &report)
        .with_context(|| format!("Failed to write report artifacts into {:?}", target_dir))?;

    println!("\n📊 Results");
    println!("   Customers analyzed: {}", report.exploration.row_count);
    println!("   Issues detected: {}", report.issues.len());
    println!(
        "   Revenue at risk: {:.2} USD / month",
        report.impact.total_monthly_revenue_at_risk_usd
    );
    println!(
        "   Operational load index: {:.2}",
        report.impact.operational_load_index
    );
    println!("   Recommendations: {}", report.recommendations.len());
    for path in &written {
        println!("   📄 {}", path.display());
    }

    let validation = &report.validation;
    if validation.approved {
        println!(
            "\n✨ APPROVED (confidence {:.2}). Analysis finished in {:.2?}",
            validation.confidence,
            start.elapsed()
        );
        return Ok(());
    }

    println!("\n⚠️  REJECTED (confidence {:.2})", validation.confidence);
    for reason in &validation.rejected_reasons {
        println!("   - {}", reason);
    }
    if config.governance.strict {
        eprintln!("\n❌ Governance gate rejected the analysis (strict mode).");
        std::process::exit(1);
    }
    Ok(())
}
