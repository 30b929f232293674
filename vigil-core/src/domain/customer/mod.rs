// vigil-core/src/domain/customer/mod.rs

pub mod record;
pub mod snapshot;

pub use record::CustomerRecord;
pub use snapshot::{FieldValue, Snapshot};
