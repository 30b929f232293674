// vigil-core/src/domain/analysis/recommender.rs

use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::domain::analysis::model::{DetectedIssue, Recommendation};
use crate::domain::rules::{Catalog, Product, Solution};

/// Joins issues to the catalog: issue type -> product -> solution.
pub struct RecommendationMapper<'a> {
    product_by_issue: BTreeMap<&'a str, &'a Product>,
    solution_by_product: BTreeMap<&'a str, &'a Solution>,
}

impl<'a> RecommendationMapper<'a> {
    /// Builds both lookups in catalog order. A later entry claiming the same
    /// key replaces the earlier one (last write wins); overlaps are surfaced by
    /// `Catalog::overlapping_targets` / `overlapping_supports`, not rejected here.
    pub fn new(catalog: &'a Catalog) -> Self {
        let mut product_by_issue = BTreeMap::new();
        for product in &catalog.products {
            for issue_type in &product.target_issues {
                product_by_issue.insert(issue_type.as_str(), product);
            }
        }

        let mut solution_by_product = BTreeMap::new();
        for solution in &catalog.solutions {
            for product_id in &solution.supports_products {
                solution_by_product.insert(product_id.as_str(), solution);
            }
        }

        Self {
            product_by_issue,
            solution_by_product,
        }
    }

    #[instrument(skip_all, fields(issues = issues.len()))]
    pub fn run(&self, issues: &[DetectedIssue]) -> Vec<Recommendation> {
        let recommendations: Vec<Recommendation> =
            issues.iter().filter_map(|issue| self.map(issue)).collect();

        debug!(
            recommendations = recommendations.len(),
            skipped = issues.len() - recommendations.len(),
            "Catalog mapping finished"
        );
        recommendations
    }

    fn map(&self, issue: &DetectedIssue) -> Option<Recommendation> {
        let product = self.product_by_issue.get(issue.issue_type.as_str())?;
        let solution = self.solution_by_product.get(product.id.as_str())?;

        Some(Recommendation {
            customer_id: issue.customer_id.clone(),
            issue_type: issue.issue_type,
            product_id: product.id.clone(),
            solution_id: solution.id.clone(),
            rationale: format!(
                "Issue '{}' maps to product '{}' and solution '{}'.",
                issue.issue_type, product.name, solution.name
            ),
        })
    }
}
