// vigil-core/src/ports/mod.rs

pub mod narrator;

pub use narrator::{NarrativeCapability, NarrativeContext, Narrator};
