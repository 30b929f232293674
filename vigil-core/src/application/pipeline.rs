// vigil-core/src/application/pipeline.rs

use std::time::Instant;
use tracing::{info, instrument, warn};

use crate::application::summary::{SummaryGenerator, SummaryPayload};
use crate::application::validation::BusinessValidator;
use crate::domain::analysis::model::AnalysisReport;
use crate::domain::analysis::{DataExplorer, ImpactAssessor, IssueDetector, RecommendationMapper};
use crate::domain::customer::{CustomerRecord, Snapshot};
use crate::domain::ports::AnalysisSource;
use crate::domain::rules::{BusinessRules, Catalog, CatalogOverlap};
use crate::error::VigilError;
use crate::ports::narrator::NarrativeCapability;

/// Validated inputs of one run.
#[derive(Debug, Clone)]
pub struct AnalysisInputs {
    pub rules: BusinessRules,
    pub catalog: Catalog,
    pub snapshot: Snapshot,
    pub records: Vec<CustomerRecord>,
}

impl AnalysisInputs {
    /// Catalog keys claimed more than once (targets first, then supports).
    pub fn catalog_overlaps(&self) -> Vec<CatalogOverlap> {
        let mut overlaps = self.catalog.overlapping_targets();
        overlaps.extend(self.catalog.overlapping_supports());
        overlaps
    }
}

/// Loads and validates configuration before touching the dataset, then
/// resolves typed records.
#[instrument(skip(source))]
pub fn prepare_inputs<S: AnalysisSource + ?Sized>(source: &S) -> Result<AnalysisInputs, VigilError> {
    let rules = source.load_rules()?;
    rules.validate_rules()?;

    let catalog = source.load_catalog()?;
    catalog.validate_catalog()?;

    for overlap in catalog
        .overlapping_targets()
        .iter()
        .chain(catalog.overlapping_supports().iter())
    {
        warn!(
            key = %overlap.key,
            claimed_by = ?overlap.claimed_by,
            winner = %overlap.winner,
            "Catalog key claimed more than once; last entry wins"
        );
    }

    let snapshot = source.load_snapshot()?;
    let records = snapshot.customers()?;
    info!(records = records.len(), "📦 Inputs ready");

    Ok(AnalysisInputs {
        rules,
        catalog,
        snapshot,
        records,
    })
}

/// Runs every stage in order over prepared inputs.
#[instrument(skip_all, fields(records = inputs.records.len()))]
pub async fn analyze(
    inputs: &AnalysisInputs,
    narrative: &NarrativeCapability,
    summary_max_chars: usize,
) -> AnalysisReport {
    let start = Instant::now();
    let rules = &inputs.rules;

    let exploration = DataExplorer::run(
        &inputs.snapshot,
        rules.analysis_rules.meaningful_correlation_threshold,
    );
    let issues = IssueDetector::new(&rules.analysis_rules).run(&inputs.records);
    let impact = ImpactAssessor::default().run(&inputs.records, &issues);
    let recommendations = RecommendationMapper::new(&inputs.catalog).run(&issues);
    let validation = BusinessValidator::new(&rules.business_validation, narrative)
        .run(&issues, &impact)
        .await;

    let summary = SummaryGenerator::new(narrative, summary_max_chars)
        .run(&SummaryPayload {
            exploration: &exploration,
            issues: &issues,
            impact: &impact,
            recommendations: &recommendations,
            validation: &validation,
        })
        .await;

    info!(
        issues = issues.len(),
        recommendations = recommendations.len(),
        approved = validation.approved,
        "🏁 Analysis finished in {:.2?}",
        start.elapsed()
    );

    AnalysisReport {
        exploration,
        issues,
        impact,
        recommendations,
        validation,
        summary,
    }
}

/// Full run: inputs through the loader port, then every stage.
pub async fn run_analysis<S: AnalysisSource + ?Sized>(
    source: &S,
    narrative: &NarrativeCapability,
    summary_max_chars: usize,
) -> Result<AnalysisReport, VigilError> {
    let inputs = prepare_inputs(source)?;
    Ok(analyze(&inputs, narrative, summary_max_chars).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::summary::FALLBACK_SUMMARY;
    use crate::domain::analysis::model::IssueType;
    use crate::domain::customer::FieldValue;
    use crate::domain::error::DomainError;
    use crate::domain::rules::{AnalysisRules, BusinessValidationRules, Product, Solution};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct InMemorySource {
        rules: BusinessRules,
        catalog: Catalog,
        snapshot: Snapshot,
        snapshot_loaded: AtomicBool,
    }

    impl AnalysisSource for InMemorySource {
        fn load_rules(&self) -> Result<BusinessRules, VigilError> {
            Ok(self.rules.clone())
        }
        fn load_catalog(&self) -> Result<Catalog, VigilError> {
            Ok(self.catalog.clone())
        }
        fn load_snapshot(&self) -> Result<Snapshot, VigilError> {
            self.snapshot_loaded.store(true, Ordering::SeqCst);
            Ok(self.snapshot.clone())
        }
    }

    fn rules() -> BusinessRules {
        BusinessRules {
            analysis_rules: AnalysisRules {
                churn_risk_high_threshold: 0.9,
                support_tickets_high_threshold: 5.0,
                payment_delay_high_threshold: 10.0,
                product_adoption_low_threshold: 0.3,
                meaningful_correlation_threshold: 0.6,
            },
            business_validation: BusinessValidationRules::default(),
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            products: vec![Product {
                id: "P1".into(),
                name: "Retention Suite".into(),
                target_issues: vec!["high_churn_risk".into()],
            }],
            solutions: vec![Solution {
                id: "S1".into(),
                name: "Success Program".into(),
                supports_products: vec!["P1".into()],
            }],
        }
    }

    fn row(id: &str, churn: f64, tickets: f64, revenue: f64) -> Vec<(String, FieldValue)> {
        vec![
            ("customer_id".into(), FieldValue::Text(id.into())),
            ("churn_risk_score".into(), FieldValue::Number(churn)),
            ("support_tickets_last_30d".into(), FieldValue::Number(tickets)),
            ("avg_payment_delay_days".into(), FieldValue::Number(0.0)),
            ("product_adoption_score".into(), FieldValue::Number(0.8)),
            ("monthly_revenue_usd".into(), FieldValue::Number(revenue)),
        ]
    }

    fn source(rows: Vec<Vec<(String, FieldValue)>>) -> InMemorySource {
        InMemorySource {
            rules: rules(),
            catalog: catalog(),
            snapshot: Snapshot::from_rows(rows),
            snapshot_loaded: AtomicBool::new(false),
        }
    }

    #[tokio::test]
    async fn test_single_churn_customer_end_to_end() -> anyhow::Result<()> {
        let src = source(vec![row("C1", 0.9, 0.0, 1000.0)]);
        let narrative = NarrativeCapability::unavailable("offline");

        let report = run_analysis(&src, &narrative, 4000).await?;

        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].issue_type, IssueType::HighChurnRisk);
        assert_eq!(report.impact.issue_impacts[0].estimated_monthly_impact_usd, 500.0);
        assert_eq!(report.impact.total_monthly_revenue_at_risk_usd, 500.0);
        assert_eq!(report.impact.operational_load_index, 0.0);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].solution_id, "S1");
        assert!(report.validation.approved);
        assert_eq!(report.summary, FALLBACK_SUMMARY);
        assert_eq!(report.exploration.row_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_two_support_breaches_give_load_two() -> anyhow::Result<()> {
        let src = source(vec![row("C1", 0.1, 6.0, 100.0), row("C2", 0.1, 5.0, 200.0)]);
        let report = run_analysis(&src, &NarrativeCapability::unavailable("offline"), 4000).await?;

        assert_eq!(report.impact.operational_load_index, 2.0);
        assert_eq!(report.impact.total_monthly_revenue_at_risk_usd, 30.0);
        // No product targets support_overload.
        assert!(report.recommendations.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_runs_are_deterministic() -> anyhow::Result<()> {
        let rows = vec![
            row("C1", 0.95, 7.0, 1000.0),
            row("C2", 0.2, 1.0, 250.0),
            row("C3", 0.91, 9.0, 730.0),
        ];
        let narrative = NarrativeCapability::unavailable("offline");
        let first = run_analysis(&source(rows.clone()), &narrative, 4000).await?;
        let second = run_analysis(&source(rows), &narrative, 4000).await?;

        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_rules_fail_before_dataset_is_read() {
        let mut src = source(vec![row("C1", 0.9, 0.0, 1000.0)]);
        src.rules.analysis_rules.meaningful_correlation_threshold = 1.5;

        let err = run_analysis(&src, &NarrativeCapability::unavailable("offline"), 4000)
            .await
            .unwrap_err();

        assert!(matches!(err, VigilError::Domain(DomainError::ConfigError(_))));
        assert!(!src.snapshot_loaded.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_missing_field_aborts_run() {
        let mut incomplete = row("C7", 0.9, 0.0, 1000.0);
        incomplete.retain(|(name, _)| name != "monthly_revenue_usd");
        let src = source(vec![incomplete]);

        let err = run_analysis(&src, &NarrativeCapability::unavailable("offline"), 4000)
            .await
            .unwrap_err();

        match err {
            VigilError::Domain(DomainError::MissingField { record, field }) => {
                assert_eq!(record, "C7");
                assert_eq!(field, "monthly_revenue_usd");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_catalog_overlaps_are_listed_not_rejected() -> anyhow::Result<()> {
        let mut src = source(vec![row("C1", 0.9, 0.0, 1000.0)]);
        src.catalog.products.push(Product {
            id: "P2".into(),
            name: "Loyalty Boost".into(),
            target_issues: vec!["high_churn_risk".into()],
        });

        let inputs = prepare_inputs(&src)?;
        let overlaps = inputs.catalog_overlaps();
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].winner, "P2");
        Ok(())
    }
}
