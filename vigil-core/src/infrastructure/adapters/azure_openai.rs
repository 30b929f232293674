// vigil-core/src/infrastructure/adapters/azure_openai.rs

//! Narrator backed by an Azure OpenAI chat deployment, optionally behind an
//! API Management gateway.
//!
//! Configuration comes from the environment:
//!
//! | Variable                      | Required |
//! |-------------------------------|----------|
//! | `AZURE_OPENAI_ENDPOINT`       | yes      |
//! | `AZURE_OPENAI_API_VERSION`    | yes      |
//! | `AZURE_OPENAI_DEPLOYMENT`     | yes      |
//! | `AZURE_OPENAI_API_KEY`        | no       |
//! | `AZURE_APIM_SUBSCRIPTION_KEY` | no       |

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::domain::project::NarrativeSettings;
use crate::error::VigilError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::narrator::{NarrativeCapability, NarrativeContext, Narrator};

pub const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
pub const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
pub const ENV_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
pub const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
pub const ENV_APIM_SUBSCRIPTION_KEY: &str = "AZURE_APIM_SUBSCRIPTION_KEY";

const APIM_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub api_version: String,
    pub deployment: String,
    pub temperature: f32,
    api_key: Option<Secret<String>>,
    apim_subscription_key: Option<Secret<String>>,
}

impl AzureOpenAiConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_version: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_version: api_version.into(),
            deployment: deployment.into(),
            temperature: 0.0,
            api_key: None,
            apim_subscription_key: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(key.into()));
        self
    }

    pub fn with_apim_subscription_key(mut self, key: impl Into<String>) -> Self {
        self.apim_subscription_key = Some(Secret::new(key.into()));
        self
    }

    /// Reads the `AZURE_*` variables through `lookup`. Returns `None` when a
    /// mandatory one is missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            non_blank(ENV_ENDPOINT)?,
            non_blank(ENV_API_VERSION)?,
            non_blank(ENV_DEPLOYMENT)?,
        );
        if let Some(key) = non_blank(ENV_API_KEY) {
            config = config.with_api_key(key);
        }
        if let Some(key) = non_blank(ENV_APIM_SUBSCRIPTION_KEY) {
            config = config.with_apim_subscription_key(key);
        }
        Some(config)
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }

    /// Header name/value pairs sent with every request.
    fn auth_headers(&self) -> Vec<(&'static str, &str)> {
        let mut headers = Vec::new();
        if let Some(key) = &self.api_key {
            headers.push(("api-key", key.expose_secret().as_str()));
        }
        if let Some(key) = &self.apim_subscription_key {
            headers.push((APIM_HEADER, key.expose_secret().as_str()));
        }
        headers
    }
}

// --- WIRE FORMAT ---

#[derive(Debug, Serialize, PartialEq)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_request(context: &NarrativeContext, temperature: f32) -> ChatRequest {
    ChatRequest {
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: context.system.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: context.user_message(),
            },
        ],
        temperature,
    }
}

fn first_choice(response: ChatResponse) -> Result<String, InfrastructureError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| InfrastructureError::Narrative("response contained no choices".into()))
}

// --- ADAPTER ---

pub struct AzureOpenAiNarrator {
    config: AzureOpenAiConfig,
    client: Client,
}

impl AzureOpenAiNarrator {
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AzureOpenAiConfig {
        &self.config
    }
}

#[async_trait]
impl Narrator for AzureOpenAiNarrator {
    #[instrument(skip_all, fields(deployment = %self.config.deployment))]
    async fn generate(&self, context: &NarrativeContext) -> Result<String, VigilError> {
        let body = build_request(context, self.config.temperature);

        let mut request = self.client.post(self.config.completions_url()).json(&body);
        for (name, value) in self.config.auth_headers() {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(InfrastructureError::from)?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(InfrastructureError::Narrative(format!(
                "Unexpected status {}: {}",
                status, detail
            ))
            .into());
        }

        let parsed: ChatResponse = response.json().await.map_err(InfrastructureError::from)?;
        let text = first_choice(parsed)?;
        debug!(chars = text.chars().count(), "Narrative received");
        Ok(text)
    }
}

// --- CAPABILITY FACTORY ---

impl NarrativeCapability {
    /// Builds the capability from the process environment.
    pub fn from_env(settings: &NarrativeSettings) -> Self {
        Self::from_lookup(settings, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(settings: &NarrativeSettings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if !settings.enabled {
            return NarrativeCapability::unavailable("narrative generation is disabled");
        }

        let Some(config) = AzureOpenAiConfig::from_lookup(lookup) else {
            return NarrativeCapability::unavailable(
                "Azure/APIM credentials are not configured",
            );
        };

        match AzureOpenAiNarrator::new(config.with_temperature(settings.temperature)) {
            Ok(narrator) => {
                info!(deployment = %narrator.config().deployment, "🧠 Narrative generation enabled");
                NarrativeCapability::available(Arc::new(narrator), settings.timeout())
            }
            Err(e) => NarrativeCapability::unavailable(format!("HTTP client unavailable: {}", e)),
        }
    }
}
