// vigil-core/src/domain/rules/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::DomainError;

/// Content of `business_rules.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BusinessRules {
    #[validate(nested)]
    pub analysis_rules: AnalysisRules,

    #[validate(nested)]
    pub business_validation: BusinessValidationRules,
}

/// Per-record thresholds plus the exploration correlation cut-off.
/// Every comparison against these values is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisRules {
    pub churn_risk_high_threshold: f64,

    #[validate(range(min = 0.0, message = "ticket threshold cannot be negative"))]
    pub support_tickets_high_threshold: f64,

    #[validate(range(min = 0.0, message = "payment delay threshold cannot be negative"))]
    pub payment_delay_high_threshold: f64,

    pub product_adoption_low_threshold: f64,

    #[validate(range(min = 0.0, max = 1.0, message = "must be within [0, 1]"))]
    pub meaningful_correlation_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BusinessValidationRules {
    #[serde(default = "default_require_measurable_impact")]
    pub require_measurable_impact: bool,

    #[serde(default = "default_relevance_confidence_min")]
    #[validate(range(min = 0.0, max = 1.0, message = "must be within [0, 1]"))]
    pub relevance_confidence_min: f64,
}

impl Default for BusinessValidationRules {
    fn default() -> Self {
        Self {
            require_measurable_impact: default_require_measurable_impact(),
            relevance_confidence_min: default_relevance_confidence_min(),
        }
    }
}

fn default_require_measurable_impact() -> bool {
    true
}

fn default_relevance_confidence_min() -> f64 {
    0.7
}

impl BusinessRules {
    /// Runs the declarative checks, then rejects NaN / infinite thresholds
    /// (range checks let NaN through).
    pub fn validate_rules(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|e| DomainError::ConfigError(format!("business rules: {}", e)))?;

        let rules = &self.analysis_rules;
        let thresholds = [
            ("churn_risk_high_threshold", rules.churn_risk_high_threshold),
            (
                "support_tickets_high_threshold",
                rules.support_tickets_high_threshold,
            ),
            (
                "payment_delay_high_threshold",
                rules.payment_delay_high_threshold,
            ),
            (
                "product_adoption_low_threshold",
                rules.product_adoption_low_threshold,
            ),
            (
                "meaningful_correlation_threshold",
                rules.meaningful_correlation_threshold,
            ),
            (
                "relevance_confidence_min",
                self.business_validation.relevance_confidence_min,
            ),
        ];

        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(DomainError::ConfigError(format!(
                    "business rules: '{}' must be a finite number",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_rules() -> BusinessRules {
        BusinessRules {
            analysis_rules: AnalysisRules {
                churn_risk_high_threshold: 0.7,
                support_tickets_high_threshold: 5.0,
                payment_delay_high_threshold: 15.0,
                product_adoption_low_threshold: 0.3,
                meaningful_correlation_threshold: 0.5,
            },
            business_validation: BusinessValidationRules::default(),
        }
    }

    #[test]
    fn test_valid_rules_pass() {
        assert!(sample_rules().validate_rules().is_ok());
    }

    #[test]
    fn test_correlation_threshold_out_of_range() {
        let mut rules = sample_rules();
        rules.analysis_rules.meaningful_correlation_threshold = 1.5;
        assert!(matches!(
            rules.validate_rules(),
            Err(DomainError::ConfigError(_))
        ));
    }

    #[test]
    fn test_nan_threshold_is_rejected() {
        let mut rules = sample_rules();
        rules.analysis_rules.churn_risk_high_threshold = f64::NAN;
        let err = rules.validate_rules().unwrap_err();
        assert!(err.to_string().contains("churn_risk_high_threshold"));
    }

    #[test]
    fn test_business_validation_defaults() {
        let yaml = "analysis_rules:\n  churn_risk_high_threshold: 0.7\n  support_tickets_high_threshold: 5\n  payment_delay_high_threshold: 15\n  product_adoption_low_threshold: 0.3\n  meaningful_correlation_threshold: 0.5\nbusiness_validation: {}\n";
        let rules: BusinessRules = serde_yaml::from_str(yaml).unwrap();
        assert!(rules.business_validation.require_measurable_impact);
        assert_eq!(rules.business_validation.relevance_confidence_min, 0.7);
    }

    #[test]
    fn test_missing_threshold_fails_to_parse() {
        let yaml = "analysis_rules:\n  churn_risk_high_threshold: 0.7\nbusiness_validation: {}\n";
        assert!(serde_yaml::from_str::<BusinessRules>(yaml).is_err());
    }
}
