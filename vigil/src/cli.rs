// vigil/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use vigil_core::application::ReportFormat;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Customer risk analysis with a governance gate", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the full analysis (Explore -> Detect -> Impact -> Recommend -> Validate -> Summarize)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Artifacts to write into the target path
        #[arg(long, value_enum, default_value_t = FormatArg::All)]
        format: FormatArg,

        /// Skip narrative generation even when Azure credentials are set
        #[arg(long, default_value = "false")]
        offline: bool,
    },

    /// 🔬 Profiles the dataset (summaries, null ratios, correlations)
    Explore {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🩺 Validates rules, catalog and dataset without running the analysis
    Check {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Json,
    All,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => ReportFormat::Markdown,
            FormatArg::Json => ReportFormat::Json,
            FormatArg::All => ReportFormat::All,
        }
    }
}
