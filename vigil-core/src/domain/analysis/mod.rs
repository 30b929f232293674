// vigil-core/src/domain/analysis/mod.rs

pub mod detector;
pub mod explorer;
pub mod impact;
pub mod model;
pub mod recommender;
pub mod stats;

pub use detector::IssueDetector;
pub use explorer::DataExplorer;
pub use impact::ImpactAssessor;
pub use model::{
    AnalysisReport, BusinessValidationResult, ColumnMap, ColumnSummary, Correlation, DataExplorationResult,
    DetectedIssue, ImpactAssessment, IssueImpact, IssueType, Recommendation, Severity,
};
pub use recommender::RecommendationMapper;
