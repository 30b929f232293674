// vigil-core/src/application/ports/renderer.rs

use crate::error::VigilError;

/// Turns a template plus a JSON context into a text artifact.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, VigilError>;
}
