// vigil-core/src/application/validation.rs

use serde_json::json;
use tracing::{info, instrument};

use crate::application::narration::{NarrativeOutcome, narrate};
use crate::domain::analysis::model::{BusinessValidationResult, DetectedIssue, ImpactAssessment};
use crate::domain::governance::GovernanceGuard;
use crate::domain::rules::BusinessValidationRules;
use crate::ports::narrator::{NarrativeCapability, NarrativeContext};

const VALIDATOR_ROLE: &str =
    "You are a strict business governance validator. Return a concise review in plain English.";
const VALIDATOR_INSTRUCTION: &str = "Provide governance notes.";

/// Governance gate plus optional narrative review notes.
pub struct BusinessValidator<'a> {
    rules: &'a BusinessValidationRules,
    narrative: &'a NarrativeCapability,
}

impl<'a> BusinessValidator<'a> {
    pub fn new(rules: &'a BusinessValidationRules, narrative: &'a NarrativeCapability) -> Self {
        Self { rules, narrative }
    }

    #[instrument(skip_all, fields(issues = issues.len()))]
    pub async fn run(
        &self,
        issues: &[DetectedIssue],
        impact: &ImpactAssessment,
    ) -> BusinessValidationResult {
        let guard = GovernanceGuard::new(self.rules);
        let pending = guard.assess(issues, impact);

        let notes = self.governance_notes(issues, impact).await;
        let result = guard.finalize(pending, notes);

        if result.approved {
            info!(confidence = result.confidence, "🛡️ Analysis approved");
        } else {
            info!(reasons = ?result.rejected_reasons, "🛡️ Analysis rejected");
        }
        result
    }

    async fn governance_notes(
        &self,
        issues: &[DetectedIssue],
        impact: &ImpactAssessment,
    ) -> Vec<String> {
        let context = NarrativeContext::new(
            VALIDATOR_ROLE,
            VALIDATOR_INSTRUCTION,
            json!({
                "rules": self.rules,
                "issues": issues,
                "impact": impact,
            }),
        );

        match narrate(self.narrative, "governance_review", &context).await {
            NarrativeOutcome::Generated(text) => vec![text],
            other => vec![skipped_note(&other)],
        }
    }
}

fn skipped_note(outcome: &NarrativeOutcome) -> String {
    format!(
        "LLM validation skipped because {}.",
        outcome
            .skip_reason()
            .unwrap_or_else(|| "no narrative was produced".to_string())
    )
}
