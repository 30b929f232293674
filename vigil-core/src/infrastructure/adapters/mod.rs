// vigil-core/src/infrastructure/adapters/mod.rs

pub mod azure_openai;

pub use azure_openai::{AzureOpenAiConfig, AzureOpenAiNarrator};
