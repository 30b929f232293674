// vigil-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Missing or non-numeric field '{field}' in record {record}")]
    #[diagnostic(
        code(vigil::domain::missing_field),
        help("Every customer record needs customer_id, churn_risk_score, support_tickets_last_30d, avg_payment_delay_days, product_adoption_score and monthly_revenue_usd.")
    )]
    MissingField { record: String, field: String },

    #[error("Configuration Error: {0}")]
    #[diagnostic(
        code(vigil::domain::config),
        help("Check business_rules.yaml and product_catalog.yaml.")
    )]
    ConfigError(String),

    #[error("Serialization Error: {0}")]
    #[diagnostic(code(vigil::domain::serialization))]
    Serialization(String),
}
