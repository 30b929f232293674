// vigil-core/src/domain/governance/guard.rs

use tracing::warn;

use crate::domain::analysis::model::{BusinessValidationResult, DetectedIssue, ImpactAssessment};
use crate::domain::rules::BusinessValidationRules;

pub const NO_ISSUES_REASON: &str = "No issues detected. Nothing to prioritize.";
pub const NO_IMPACT_REASON: &str = "No measurable financial impact found.";
pub const LOW_CONFIDENCE_REASON: &str = "Confidence below minimum relevance threshold.";

/// Confidence is binary: findings exist or they do not.
pub const CONFIDENCE_WITH_ISSUES: f64 = 0.8;
pub const CONFIDENCE_WITHOUT_ISSUES: f64 = 0.2;

/// Gate state between the deterministic checks and the confidence floor.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingValidation {
    pub confidence: f64,
    pub rejected_reasons: Vec<String>,
}

impl PendingValidation {
    pub fn provisionally_approved(&self) -> bool {
        self.rejected_reasons.is_empty()
    }
}

/// Governance gate: decides whether an analysis is actionable.
pub struct GovernanceGuard<'a> {
    rules: &'a BusinessValidationRules,
}

impl<'a> GovernanceGuard<'a> {
    pub fn new(rules: &'a BusinessValidationRules) -> Self {
        Self { rules }
    }

    /// Deterministic checks: issue presence, measurable impact, confidence.
    pub fn assess(&self, issues: &[DetectedIssue], impact: &ImpactAssessment) -> PendingValidation {
        let mut rejected_reasons = Vec::new();

        if issues.is_empty() {
            rejected_reasons.push(NO_ISSUES_REASON.to_string());
        }

        if self.rules.require_measurable_impact && impact.total_monthly_revenue_at_risk_usd <= 0.0
        {
            rejected_reasons.push(NO_IMPACT_REASON.to_string());
        }

        PendingValidation {
            confidence: confidence_for(issues),
            rejected_reasons,
        }
    }

    /// Applies the confidence floor and freezes the result. Notes are carried
    /// through untouched and never influence approval.
    pub fn finalize(
        &self,
        pending: PendingValidation,
        governance_notes: Vec<String>,
    ) -> BusinessValidationResult {
        let PendingValidation {
            confidence,
            mut rejected_reasons,
        } = pending;

        if rejected_reasons.is_empty() && confidence < self.rules.relevance_confidence_min {
            warn!(
                confidence,
                minimum = self.rules.relevance_confidence_min,
                "Analysis below relevance confidence floor"
            );
            rejected_reasons.push(LOW_CONFIDENCE_REASON.to_string());
        }

        BusinessValidationResult {
            approved: rejected_reasons.is_empty(),
            confidence,
            rejected_reasons,
            governance_notes,
        }
    }
}

pub fn confidence_for(issues: &[DetectedIssue]) -> f64 {
    if issues.is_empty() {
        CONFIDENCE_WITHOUT_ISSUES
    } else {
        CONFIDENCE_WITH_ISSUES
    }
}
