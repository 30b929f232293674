// vigil-core/src/domain/rules/mod.rs

pub mod catalog;
pub mod configuration;

pub use catalog::{Catalog, CatalogOverlap, Product, Solution};
pub use configuration::{AnalysisRules, BusinessRules, BusinessValidationRules};
