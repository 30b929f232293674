// vigil-core/src/ports/narrator.rs

// Free-text generation is an optional collaborator: every caller must handle
// the `Unavailable` variant and fall back to fixed text.

use crate::error::VigilError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One narrative request: a role prompt, an instruction and a JSON payload.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeContext {
    pub system: String,
    pub instruction: String,
    pub payload: serde_json::Value,
}

impl NarrativeContext {
    pub fn new(
        system: impl Into<String>,
        instruction: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            system: system.into(),
            instruction: instruction.into(),
            payload,
        }
    }

    /// User-facing message: instruction followed by the serialized payload.
    pub fn user_message(&self) -> String {
        format!("{}\nPayload: {}", self.instruction, self.payload)
    }
}

#[async_trait]
pub trait Narrator: Send + Sync {
    async fn generate(&self, context: &NarrativeContext) -> Result<String, VigilError>;
}

#[derive(Clone)]
pub enum NarrativeCapability {
    Unavailable { reason: String },
    Available {
        narrator: Arc<dyn Narrator>,
        timeout: Duration,
    },
}

impl NarrativeCapability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        NarrativeCapability::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn available(narrator: Arc<dyn Narrator>, timeout: Duration) -> Self {
        NarrativeCapability::Available { narrator, timeout }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, NarrativeCapability::Available { .. })
    }
}

impl fmt::Debug for NarrativeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeCapability::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
            NarrativeCapability::Available { timeout, .. } => f
                .debug_struct("Available")
                .field("timeout", timeout)
                .finish_non_exhaustive(),
        }
    }
}
