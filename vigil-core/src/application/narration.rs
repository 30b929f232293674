// vigil-core/src/application/narration.rs

use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

use crate::ports::narrator::{NarrativeCapability, NarrativeContext};

/// Result of one guarded narrative call. Callers never see an error: every
/// non-generated variant carries enough to explain the fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    Generated(String),
    Unavailable(String),
    Failed(String),
    TimedOut(Duration),
}

impl NarrativeOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            NarrativeOutcome::Generated(text) => Some(text),
            _ => None,
        }
    }

    /// Human-readable cause when no narrative was produced.
    pub fn skip_reason(&self) -> Option<String> {
        match self {
            NarrativeOutcome::Generated(_) => None,
            NarrativeOutcome::Unavailable(reason) => Some(reason.clone()),
            NarrativeOutcome::Failed(cause) => Some(format!("the narrative call failed ({})", cause)),
            NarrativeOutcome::TimedOut(limit) => Some(format!(
                "the narrative call timed out after {}s",
                limit.as_secs()
            )),
        }
    }
}

/// Runs the narrator, if any, under its timeout, with timing logs.
#[instrument(skip(capability, context))]
pub async fn narrate(
    capability: &NarrativeCapability,
    task: &str,
    context: &NarrativeContext,
) -> NarrativeOutcome {
    let (narrator, limit) = match capability {
        NarrativeCapability::Unavailable { reason } => {
            debug!(reason = %reason, "Narrative capability unavailable");
            return NarrativeOutcome::Unavailable(reason.clone());
        }
        NarrativeCapability::Available { narrator, timeout } => (narrator, *timeout),
    };

    let start = Instant::now();
    debug!("⚡ Requesting narrative");

    match tokio::time::timeout(limit, narrator.generate(context)).await {
        Ok(Ok(text)) => {
            info!("✅ Narrative generated in {:.2?}", start.elapsed());
            NarrativeOutcome::Generated(text)
        }
        Ok(Err(e)) => {
            error!("❌ Narrative failed after {:.2?}: {}", start.elapsed(), e);
            NarrativeOutcome::Failed(e.to_string())
        }
        Err(_) => {
            warn!("⏱️ Narrative timed out after {:.2?}", limit);
            NarrativeOutcome::TimedOut(limit)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::error::VigilError;
    use crate::ports::narrator::{NarrativeCapability, NarrativeContext, Narrator};

    pub enum Script {
        Reply(&'static str),
        Fail,
        Hang,
    }

    /// Scripted narrator that counts its calls.
    pub struct ScriptedNarrator {
        pub script: Script,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl Narrator for ScriptedNarrator {
        async fn generate(&self, _context: &NarrativeContext) -> Result<String, VigilError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script {
                Script::Reply(text) => Ok(text.to_string()),
                Script::Fail => Err(VigilError::InternalError("gateway returned 502".into())),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        }
    }

    pub fn capability(script: Script) -> (NarrativeCapability, Arc<ScriptedNarrator>) {
        let narrator = Arc::new(ScriptedNarrator {
            script,
            calls: AtomicUsize::new(0),
        });
        let capability =
            NarrativeCapability::available(narrator.clone(), Duration::from_millis(50));
        (capability, narrator)
    }
}
