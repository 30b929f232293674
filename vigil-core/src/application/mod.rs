// vigil-core/src/application/mod.rs

pub mod clean;
pub mod narration;
pub mod pipeline;
pub mod ports;
pub mod report;
pub mod summary;
pub mod validation;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use vigil_core::application::{run_analysis, clean_project, ReportWriter};`

pub use clean::clean_project;
pub use narration::{NarrativeOutcome, narrate};
pub use pipeline::{AnalysisInputs, analyze, prepare_inputs, run_analysis};
pub use report::{ReportFormat, ReportWriter};
pub use summary::SummaryGenerator;
pub use validation::BusinessValidator;
