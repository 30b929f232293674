// vigil-core/src/domain/analysis/model.rs

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

// --- ISSUES ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    HighChurnRisk,
    SupportOverload,
    PaymentDelayRisk,
    LowProductAdoption,
}

impl IssueType {
    pub const ALL: [IssueType; 4] = [
        IssueType::HighChurnRisk,
        IssueType::SupportOverload,
        IssueType::PaymentDelayRisk,
        IssueType::LowProductAdoption,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::HighChurnRisk => "high_churn_risk",
            IssueType::SupportOverload => "support_overload",
            IssueType::PaymentDelayRisk => "payment_delay_risk",
            IssueType::LowProductAdoption => "low_product_adoption",
        }
    }

    /// Issues that add to the operational load index.
    pub fn is_operational(&self) -> bool {
        matches!(self, IssueType::SupportOverload | IssueType::PaymentDelayRisk)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedIssue {
    pub customer_id: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    /// Field name -> value that breached the threshold.
    pub evidence: BTreeMap<String, serde_json::Number>,
}

/// Whole-valued readings (ticket counts, delay days) stay integers.
pub fn evidence_value(value: f64) -> Option<serde_json::Number> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(serde_json::Number::from(value as i64))
    } else {
        serde_json::Number::from_f64(value)
    }
}

// --- IMPACT ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueImpact {
    pub customer_id: String,
    pub issue_type: IssueType,
    pub estimated_monthly_impact_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImpactAssessment {
    pub issue_impacts: Vec<IssueImpact>,
    pub total_monthly_revenue_at_risk_usd: f64,
    pub operational_load_index: f64,
}

// --- RECOMMENDATIONS ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub customer_id: String,
    pub issue_type: IssueType,
    pub product_id: String,
    pub solution_id: String,
    pub rationale: String,
}

// --- EXPLORATION ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub column_a: String,
    pub column_b: String,
    pub coefficient: f64,
}

/// Per-column values kept in snapshot column order. Serializes as a map.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<V>(Vec<(String, V)>);

impl<V> ColumnMap<V> {
    pub fn get(&self, column: &str) -> Option<&V> {
        self.0.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for ColumnMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> FromIterator<(String, V)> for ColumnMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Serialize> Serialize for ColumnMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct ColumnMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for ColumnMapVisitor<V> {
    type Value = ColumnMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map keyed by column name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, V>()? {
            entries.push(entry);
        }
        Ok(ColumnMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for ColumnMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ColumnMapVisitor(PhantomData))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataExplorationResult {
    pub row_count: usize,
    pub columns: Vec<String>,
    pub null_ratio_by_column: ColumnMap<f64>,
    pub numeric_summary: ColumnMap<ColumnSummary>,
    pub meaningful_correlations: Vec<Correlation>,
}

// --- GOVERNANCE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessValidationResult {
    pub approved: bool,
    pub confidence: f64,
    pub rejected_reasons: Vec<String>,
    pub governance_notes: Vec<String>,
}

// --- AGGREGATE ROOT ---

/// Sole output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub exploration: DataExplorationResult,
    pub issues: Vec<DetectedIssue>,
    pub impact: ImpactAssessment,
    pub recommendations: Vec<Recommendation>,
    pub validation: BusinessValidationResult,
    pub summary: String,
}

/// Rounds to `decimals` places, ties going to the even digit.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_type_serializes_snake_case() {
        let json = serde_json::to_string(&IssueType::PaymentDelayRisk).unwrap();
        assert_eq!(json, "\"payment_delay_risk\"");
        for issue_type in IssueType::ALL {
            let quoted = format!("\"{}\"", issue_type.as_str());
            assert_eq!(serde_json::to_string(&issue_type).unwrap(), quoted);
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.345678, 4), 12.3457);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(500.125, 2), 500.12);
        assert_eq!(round_to(-0.98765, 2), -0.99);
    }

    #[test]
    fn test_evidence_keeps_whole_readings_integral() {
        let json = |v: f64| serde_json::to_string(&evidence_value(v).unwrap()).unwrap();
        assert_eq!(json(7.0), "7");
        assert_eq!(json(0.82), "0.82");
        assert_eq!(evidence_value(f64::NAN), None);
    }

    #[test]
    fn test_column_map_serializes_in_insertion_order() {
        let map: ColumnMap<f64> = [("z".to_string(), 0.5), ("a".to_string(), 0.0)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"z":0.5,"a":0.0}"#);

        let back: ColumnMap<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["z", "a"]);
        assert_eq!(back.get("z"), Some(&0.5));
        assert!(!back.contains_key("m"));
    }
}
