// vigil-core/src/domain/rules/catalog.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::domain::error::DomainError;

/// Content of `product_catalog.yaml`: products target issue types, solutions
/// support products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
pub struct Catalog {
    #[validate(nested)]
    pub products: Vec<Product>,

    #[validate(nested)]
    pub solutions: Vec<Solution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[validate(length(min = 1, message = "Product id cannot be empty"))]
    pub id: String,
    pub name: String,
    /// Issue type names (e.g. "high_churn_risk"). Unknown names never match.
    pub target_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Solution {
    #[validate(length(min = 1, message = "Solution id cannot be empty"))]
    pub id: String,
    pub name: String,
    pub supports_products: Vec<String>,
}

/// A key claimed by more than one catalog entry. Only the last claimant is
/// used when mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOverlap {
    pub key: String,
    pub claimed_by: Vec<String>,
    pub winner: String,
}

impl Catalog {
    pub fn validate_catalog(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::ConfigError(format!("product catalog: {}", e)))
    }

    /// Issue types targeted by several products.
    pub fn overlapping_targets(&self) -> Vec<CatalogOverlap> {
        overlaps(
            self.products
                .iter()
                .flat_map(|p| p.target_issues.iter().map(move |t| (t, &p.id))),
        )
    }

    /// Products supported by several solutions.
    pub fn overlapping_supports(&self) -> Vec<CatalogOverlap> {
        overlaps(
            self.solutions
                .iter()
                .flat_map(|s| s.supports_products.iter().map(move |p| (p, &s.id))),
        )
    }
}

fn overlaps<'a>(claims: impl Iterator<Item = (&'a String, &'a String)>) -> Vec<CatalogOverlap> {
    let mut by_key: BTreeMap<&String, Vec<String>> = BTreeMap::new();
    for (key, owner) in claims {
        by_key.entry(key).or_default().push(owner.clone());
    }

    by_key
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .filter_map(|(key, owners)| {
            let winner = owners.last()?.clone();
            Some(CatalogOverlap {
                key: key.clone(),
                claimed_by: owners,
                winner,
            })
        })
        .collect()
}
