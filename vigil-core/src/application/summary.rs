// vigil-core/src/application/summary.rs

use serde::Serialize;
use tracing::{info, instrument};

use crate::application::narration::{NarrativeOutcome, narrate};
use crate::domain::analysis::model::{
    BusinessValidationResult, DataExplorationResult, DetectedIssue, ImpactAssessment,
    Recommendation,
};
use crate::ports::narrator::{NarrativeCapability, NarrativeContext};

pub const FALLBACK_SUMMARY: &str = "Fallback summary: analysis completed with deterministic logic; \
configure Azure/APIM credentials to enable narrative synthesis.";

const SUMMARY_ROLE: &str = "You are an analytics consultant writing concise executive summaries.";
const SUMMARY_INSTRUCTION: &str = "Summarize the analysis output with top issues, impact and \
recommendations. Output in up to 8 bullet points.";

/// Everything the summary may talk about.
#[derive(Debug, Serialize)]
pub struct SummaryPayload<'a> {
    pub exploration: &'a DataExplorationResult,
    pub issues: &'a [DetectedIssue],
    pub impact: &'a ImpactAssessment,
    pub recommendations: &'a [Recommendation],
    pub validation: &'a BusinessValidationResult,
}

pub struct SummaryGenerator<'a> {
    narrative: &'a NarrativeCapability,
    max_chars: usize,
}

impl<'a> SummaryGenerator<'a> {
    pub fn new(narrative: &'a NarrativeCapability, max_chars: usize) -> Self {
        Self {
            narrative,
            max_chars,
        }
    }

    #[instrument(skip_all)]
    pub async fn run(&self, payload: &SummaryPayload<'_>) -> String {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                info!("Summary payload could not be serialized: {}", e);
                return FALLBACK_SUMMARY.to_string();
            }
        };
        let context = NarrativeContext::new(SUMMARY_ROLE, SUMMARY_INSTRUCTION, payload);

        match narrate(self.narrative, "executive_summary", &context).await {
            NarrativeOutcome::Generated(text) => bound_chars(text.trim(), self.max_chars),
            other => {
                info!(
                    reason = %other.skip_reason().unwrap_or_default(),
                    "📝 Using fallback summary"
                );
                FALLBACK_SUMMARY.to_string()
            }
        }
    }
}

/// Keeps at most `max` characters, never splitting a code point.
fn bound_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::narration::testing::{Script, capability};

    fn validation() -> BusinessValidationResult {
        BusinessValidationResult {
            approved: false,
            confidence: 0.2,
            rejected_reasons: vec![],
            governance_notes: vec![],
        }
    }

    async fn summarize(narrative: &NarrativeCapability, max_chars: usize) -> String {
        let exploration = DataExplorationResult::default();
        let impact = ImpactAssessment::default();
        let validation = validation();
        let payload = SummaryPayload {
            exploration: &exploration,
            issues: &[],
            impact: &impact,
            recommendations: &[],
            validation: &validation,
        };
        SummaryGenerator::new(narrative, max_chars).run(&payload).await
    }

    #[tokio::test]
    async fn test_fallback_when_unavailable() {
        let narrative = NarrativeCapability::unavailable("no credentials");
        assert_eq!(summarize(&narrative, 4000).await, FALLBACK_SUMMARY);
    }

    #[tokio::test]
    async fn test_fallback_when_failing_or_slow() {
        for script in [Script::Fail, Script::Hang] {
            let (narrative, _) = capability(script);
            assert_eq!(summarize(&narrative, 4000).await, FALLBACK_SUMMARY);
        }
    }

    #[tokio::test]
    async fn test_generated_summary_is_bounded() {
        let (narrative, narrator) = capability(Script::Reply("  - churn is up\n- revenue at risk  "));
        assert_eq!(summarize(&narrative, 8).await, "- churn ");
        assert_eq!(narrator.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bound_chars_respects_code_points() {
        assert_eq!(bound_chars("héllo", 2), "hé");
        assert_eq!(bound_chars("abc", 10), "abc");
        assert_eq!(bound_chars("abc", 0), "");
    }
}
