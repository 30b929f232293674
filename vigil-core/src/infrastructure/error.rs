// vigil-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(vigil::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(vigil::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(vigil::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(vigil::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Dataset not found at '{0}'")]
    #[diagnostic(
        code(vigil::infra::dataset_missing),
        help("Set `dataset-path` in vigil.yaml or export VIGIL_DATASET_PATH.")
    )]
    DatasetNotFound(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(vigil::infra::template),
        help("Check the Jinja syntax ({{ ... }}) of the report template.")
    )]
    TemplateError(#[from] minijinja::Error),

    // --- NARRATIVE SERVICE ---
    #[error("Narrative service error: {0}")]
    #[diagnostic(
        code(vigil::infra::narrative),
        help("Check the AZURE_OPENAI_* / AZURE_APIM_* environment variables.")
    )]
    Narrative(String),
}

impl From<reqwest::Error> for InfrastructureError {
    fn from(err: reqwest::Error) -> Self {
        InfrastructureError::Narrative(err.to_string())
    }
}
