// vigil-core/src/domain/analysis/detector.rs

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::domain::analysis::model::{DetectedIssue, IssueType, Severity, evidence_value};
use crate::domain::customer::CustomerRecord;
use crate::domain::customer::record::{
    CHURN_RISK_SCORE, PAYMENT_DELAY_DAYS, PRODUCT_ADOPTION_SCORE, SUPPORT_TICKETS,
};
use crate::domain::rules::AnalysisRules;

/// Applies the business thresholds to every record independently.
pub struct IssueDetector<'a> {
    rules: &'a AnalysisRules,
}

impl<'a> IssueDetector<'a> {
    pub fn new(rules: &'a AnalysisRules) -> Self {
        Self { rules }
    }

    /// Issues come out in record order, then in rule order within a record.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn run(&self, records: &[CustomerRecord]) -> Vec<DetectedIssue> {
        let issues: Vec<DetectedIssue> = records
            .par_iter()
            .map(|record| self.evaluate(record))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        debug!(issues = issues.len(), "Issue detection finished");
        issues
    }

    /// Every rule is checked; a breach is inclusive of the threshold itself.
    pub fn evaluate(&self, record: &CustomerRecord) -> Vec<DetectedIssue> {
        let rules = self.rules;
        let checks = [
            (
                record.churn_risk_score >= rules.churn_risk_high_threshold,
                IssueType::HighChurnRisk,
                Severity::High,
                CHURN_RISK_SCORE,
                record.churn_risk_score,
            ),
            (
                record.support_tickets_last_30d >= rules.support_tickets_high_threshold,
                IssueType::SupportOverload,
                Severity::Medium,
                SUPPORT_TICKETS,
                record.support_tickets_last_30d,
            ),
            (
                record.avg_payment_delay_days >= rules.payment_delay_high_threshold,
                IssueType::PaymentDelayRisk,
                Severity::Medium,
                PAYMENT_DELAY_DAYS,
                record.avg_payment_delay_days,
            ),
            (
                record.product_adoption_score <= rules.product_adoption_low_threshold,
                IssueType::LowProductAdoption,
                Severity::High,
                PRODUCT_ADOPTION_SCORE,
                record.product_adoption_score,
            ),
        ];

        checks
            .into_iter()
            .filter(|(breached, ..)| *breached)
            .map(|(_, issue_type, severity, field, value)| DetectedIssue {
                customer_id: record.customer_id.clone(),
                issue_type,
                severity,
                evidence: evidence_value(value)
                    .map(|v| (field.to_string(), v))
                    .into_iter()
                    .collect(),
            })
            .collect()
    }
}
