// vigil-core/src/domain/ports/source.rs

use crate::domain::customer::Snapshot;
use crate::domain::rules::{BusinessRules, Catalog};
use crate::error::VigilError;

/// Everything a pipeline run reads. Implementations decide where it lives.
pub trait AnalysisSource: Send + Sync {
    fn load_rules(&self) -> Result<BusinessRules, VigilError>;
    fn load_catalog(&self) -> Result<Catalog, VigilError>;
    fn load_snapshot(&self) -> Result<Snapshot, VigilError>;
}
