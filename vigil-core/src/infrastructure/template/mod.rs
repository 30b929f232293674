// vigil-core/src/infrastructure/template/mod.rs

pub mod jinja;

pub use jinja::JinjaRenderer;
