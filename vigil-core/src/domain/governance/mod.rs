// vigil-core/src/domain/governance/mod.rs

pub mod guard;

pub use guard::{GovernanceGuard, PendingValidation};
