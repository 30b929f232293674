// vigil-core/src/infrastructure/config/mod.rs

pub mod dataset;
pub mod project;
pub mod workspace;

pub use crate::domain::project::ProjectConfig;
pub use dataset::{load_dataset, parse_dataset};
pub use project::{
    BUSINESS_RULES_FILE, PRODUCT_CATALOG_FILE, apply_env_overrides_with, load_project_config,
};
pub use workspace::ProjectWorkspace;
