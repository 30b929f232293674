// vigil-core/src/application/report.rs

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::application::ports::TemplateEngine;
use crate::domain::analysis::model::AnalysisReport;
use crate::domain::error::DomainError;
use crate::error::VigilError;
use crate::infrastructure::fs::write_artifact;

pub const JSON_REPORT_FILE: &str = "analysis_report.json";
pub const MARKDOWN_REPORT_FILE: &str = "analysis_report.md";

const MARKDOWN_TEMPLATE: &str = include_str!("../../templates/analysis_report.md.j2");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
    All,
}

impl ReportFormat {
    fn wants_json(self) -> bool {
        matches!(self, ReportFormat::Json | ReportFormat::All)
    }

    fn wants_markdown(self) -> bool {
        matches!(self, ReportFormat::Markdown | ReportFormat::All)
    }
}

/// What lands on disk: the report plus run metadata.
#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a> {
    pub generated_at: String,
    pub project_name: &'a str,
    pub report: &'a AnalysisReport,
}

impl<'a> ReportEnvelope<'a> {
    pub fn new(project_name: &'a str, report: &'a AnalysisReport) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            project_name,
            report,
        }
    }
}

pub struct ReportWriter<'a, T: TemplateEngine> {
    target_dir: &'a Path,
    renderer: &'a T,
}

impl<'a, T: TemplateEngine> ReportWriter<'a, T> {
    pub fn new(target_dir: &'a Path, renderer: &'a T) -> Self {
        Self {
            target_dir,
            renderer,
        }
    }

    /// Writes the requested artifacts and returns their paths.
    #[instrument(skip(self, report), fields(target = ?self.target_dir))]
    pub fn write(
        &self,
        format: ReportFormat,
        project_name: &str,
        report: &AnalysisReport,
    ) -> Result<Vec<PathBuf>, VigilError> {
        let envelope = ReportEnvelope::new(project_name, report);
        let mut written = Vec::new();

        if format.wants_json() {
            written.push(self.write_json(&envelope)?);
        }
        if format.wants_markdown() {
            written.push(self.write_markdown(&envelope)?);
        }
        Ok(written)
    }

    pub fn write_json(&self, envelope: &ReportEnvelope<'_>) -> Result<PathBuf, VigilError> {
        let json = serde_json::to_string_pretty(envelope)
            .map_err(|e| DomainError::Serialization(e.to_string()))?;
        let path = self.target_dir.join(JSON_REPORT_FILE);
        write_artifact(&path, json)?;
        info!(path = ?path, "📄 JSON report written");
        Ok(path)
    }

    pub fn write_markdown(&self, envelope: &ReportEnvelope<'_>) -> Result<PathBuf, VigilError> {
        let context = serde_json::to_value(envelope)
            .map_err(|e| DomainError::Serialization(e.to_string()))?;
        let markdown = self.renderer.render(MARKDOWN_TEMPLATE, &context)?;
        let path = self.target_dir.join(MARKDOWN_REPORT_FILE);
        write_artifact(&path, markdown)?;
        info!(path = ?path, "📝 Markdown report written");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::analysis::model::{
        BusinessValidationResult, DataExplorationResult, DetectedIssue, ImpactAssessment,
        IssueImpact, IssueType, Recommendation, Severity,
    };
    use crate::infrastructure::template::JinjaRenderer;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    fn report(approved: bool) -> AnalysisReport {
        AnalysisReport {
            exploration: DataExplorationResult {
                row_count: 1,
                ..DataExplorationResult::default()
            },
            issues: vec![DetectedIssue {
                customer_id: "C1".into(),
                issue_type: IssueType::HighChurnRisk,
                severity: Severity::High,
                evidence: BTreeMap::from([(
                "churn_risk_score".to_string(),
                serde_json::Number::from_f64(0.9).unwrap(),
            )]),
            }],
            impact: ImpactAssessment {
                issue_impacts: vec![IssueImpact {
                    customer_id: "C1".into(),
                    issue_type: IssueType::HighChurnRisk,
                    estimated_monthly_impact_usd: 1500.0,
                }],
                total_monthly_revenue_at_risk_usd: 1500.0,
                operational_load_index: 0.0,
            },
            recommendations: vec![Recommendation {
                customer_id: "C1".into(),
                issue_type: IssueType::HighChurnRisk,
                product_id: "P1".into(),
                solution_id: "S1".into(),
                rationale: "Issue 'high_churn_risk' maps to product 'Retention Suite' and solution 'Success Program'.".into(),
            }],
            validation: BusinessValidationResult {
                approved,
                confidence: 0.8,
                rejected_reasons: if approved {
                    vec![]
                } else {
                    vec!["Confidence below minimum relevance threshold.".into()]
                },
                governance_notes: vec!["LLM validation skipped because offline.".into()],
            },
            summary: "Short summary.".into(),
        }
    }

    #[test]
    fn test_json_envelope() -> Result<()> {
        let dir = tempdir()?;
        let renderer = JinjaRenderer::new();
        let writer = ReportWriter::new(dir.path(), &renderer);

        let paths = writer.write(ReportFormat::Json, "demo", &report(true))?;
        assert_eq!(paths, vec![dir.path().join(JSON_REPORT_FILE)]);

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&paths[0])?)?;
        assert_eq!(value["project_name"], "demo");
        assert!(value["generated_at"].as_str().unwrap().contains('T'));
        assert_eq!(value["report"]["issues"][0]["issue_type"], "high_churn_risk");
        assert_eq!(value["report"]["validation"]["approved"], true);
        assert!(!dir.path().join(MARKDOWN_REPORT_FILE).exists());
        Ok(())
    }

    #[test]
    fn test_markdown_report_sections() -> Result<()> {
        let dir = tempdir()?;
        let renderer = JinjaRenderer::new();
        let writer = ReportWriter::new(dir.path(), &renderer);

        writer.write(ReportFormat::Markdown, "demo", &report(false))?;
        let md = fs::read_to_string(dir.path().join(MARKDOWN_REPORT_FILE))?;

        assert!(md.starts_with("# Customer Risk Analysis: demo"));
        assert!(md.contains("**Status:** REJECTED"));
        assert!(md.contains("**Rejected:** Confidence below minimum relevance threshold."));
        assert!(md.contains("$1,500.00"));
        assert!(md.contains("| C1 | high_churn_risk | high | churn_risk_score = 0.9 |"));
        assert!(md.contains("**C1** (high_churn_risk): P1 + S1."));
        assert!(md.contains("> LLM validation skipped because offline."));
        assert!(md.contains("Short summary."));
        Ok(())
    }

    #[test]
    fn test_all_formats_into_missing_directory() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("target");
        let renderer = JinjaRenderer::new();

        let paths = ReportWriter::new(&target, &renderer).write(ReportFormat::All, "demo", &report(true))?;

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.exists()));
        Ok(())
    }
}
