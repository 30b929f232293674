// vigil-core/src/domain/mod.rs

pub mod analysis;
pub mod customer;
pub mod error;
pub mod governance;
pub mod ports;
pub mod project;
pub mod rules;

pub use error::DomainError;
