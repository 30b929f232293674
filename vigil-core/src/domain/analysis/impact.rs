// vigil-core/src/domain/analysis/impact.rs

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

use crate::domain::analysis::model::{
    DetectedIssue, ImpactAssessment, IssueImpact, IssueType, round_to,
};
use crate::domain::customer::CustomerRecord;

/// Share of monthly revenue used for issue types missing from the table.
pub const DEFAULT_MULTIPLIER: f64 = 0.05;

/// Converts issues into monthly revenue at risk and an operational load index.
#[derive(Debug, Clone)]
pub struct ImpactAssessor {
    multipliers: BTreeMap<IssueType, f64>,
}

impl Default for ImpactAssessor {
    fn default() -> Self {
        Self::with_multipliers(BTreeMap::from([
            (IssueType::HighChurnRisk, 0.50),
            (IssueType::SupportOverload, 0.10),
            (IssueType::PaymentDelayRisk, 0.15),
            (IssueType::LowProductAdoption, 0.20),
        ]))
    }
}

impl ImpactAssessor {
    pub fn with_multipliers(multipliers: BTreeMap<IssueType, f64>) -> Self {
        Self { multipliers }
    }

    pub fn multiplier(&self, issue_type: IssueType) -> f64 {
        self.multipliers
            .get(&issue_type)
            .copied()
            .unwrap_or(DEFAULT_MULTIPLIER)
    }

    #[instrument(skip_all, fields(issues = issues.len()))]
    pub fn run(&self, records: &[CustomerRecord], issues: &[DetectedIssue]) -> ImpactAssessment {
        let revenue_lookup: HashMap<&str, f64> = records
            .iter()
            .map(|r| (r.customer_id.as_str(), r.monthly_revenue_usd))
            .collect();

        let mut operational_load_index = 0.0;
        let issue_impacts: Vec<IssueImpact> = issues
            .iter()
            .map(|issue| {
                let base_revenue = revenue_lookup
                    .get(issue.customer_id.as_str())
                    .copied()
                    .unwrap_or(0.0);

                if issue.issue_type.is_operational() {
                    operational_load_index += 1.0;
                }

                IssueImpact {
                    customer_id: issue.customer_id.clone(),
                    issue_type: issue.issue_type,
                    estimated_monthly_impact_usd: round_to(
                        base_revenue * self.multiplier(issue.issue_type),
                        2,
                    ),
                }
            })
            .collect();

        // The total is built from the rounded line items so the two always agree
        let total: f64 = issue_impacts
            .iter()
            .map(|i| i.estimated_monthly_impact_usd)
            .sum();

        let assessment = ImpactAssessment {
            total_monthly_revenue_at_risk_usd: round_to(total, 2),
            operational_load_index: round_to(operational_load_index, 2),
            issue_impacts,
        };

        debug!(
            revenue_at_risk = assessment.total_monthly_revenue_at_risk_usd,
            load = assessment.operational_load_index,
            "Impact assessed"
        );
        assessment
    }
}
