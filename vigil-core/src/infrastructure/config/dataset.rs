// vigil-core/src/infrastructure/config/dataset.rs

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::domain::customer::{FieldValue, Snapshot};
use crate::infrastructure::error::InfrastructureError;

/// On-disk layout: `records:` followed by one mapping per customer.
#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    records: Vec<Mapping>,
}

#[instrument]
pub fn load_dataset(path: &Path) -> Result<Snapshot, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::DatasetNotFound(
            path.display().to_string(),
        ));
    }
    let content = fs::read_to_string(path)?;
    let snapshot = parse_dataset(&content)?;
    info!(
        rows = snapshot.row_count(),
        columns = snapshot.columns().len(),
        "Dataset loaded"
    );
    Ok(snapshot)
}

/// Parses a dataset document. Column order follows the first record that
/// introduces each key.
pub fn parse_dataset(content: &str) -> Result<Snapshot, InfrastructureError> {
    let file: DatasetFile = serde_yaml::from_str(content)?;

    let rows = file
        .records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| convert_record(idx, record))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Snapshot::from_rows(rows))
}

fn convert_record(
    idx: usize,
    record: Mapping,
) -> Result<Vec<(String, FieldValue)>, InfrastructureError> {
    record
        .into_iter()
        .map(|(key, value)| {
            let column = match key {
                Value::String(s) => s,
                other => {
                    return Err(InfrastructureError::ConfigError(format!(
                        "dataset record #{} has a non-string column name: {:?}",
                        idx + 1,
                        other
                    )));
                }
            };
            let cell = convert_value(value).ok_or_else(|| {
                InfrastructureError::ConfigError(format!(
                    "dataset record #{} column '{}' holds a nested value",
                    idx + 1,
                    column
                ))
            })?;
            Ok((column, cell))
        })
        .collect()
}

fn convert_value(value: Value) -> Option<FieldValue> {
    match value {
        Value::Null => Some(FieldValue::Null),
        Value::Bool(b) => Some(FieldValue::Bool(b)),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) => Some(FieldValue::Text(s)),
        Value::Tagged(tagged) => convert_value(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_parse_keeps_first_seen_column_order() -> Result<()> {
        let yaml = r#"
records:
  - customer_id: C001
    monthly_revenue_usd: 1200
    churn_risk_score: 0.82
  - customer_id: C002
    churn_risk_score: 0.1
    region: north
"#;
        let snapshot = parse_dataset(yaml)?;
        assert_eq!(
            snapshot.columns(),
            ["customer_id", "monthly_revenue_usd", "churn_risk_score", "region"]
        );
        assert_eq!(snapshot.row_count(), 2);
        assert_eq!(snapshot.rows()[1][1], FieldValue::Null);
        assert_eq!(snapshot.rows()[0][1], FieldValue::Number(1200.0));
        assert_eq!(snapshot.rows()[1][3], FieldValue::Text("north".into()));
        Ok(())
    }

    #[test]
    fn test_empty_document_is_empty_snapshot() -> Result<()> {
        let snapshot = parse_dataset("records: []")?;
        assert!(snapshot.is_empty());
        Ok(())
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let err = parse_dataset("records:\n  - customer_id: C1\n    tags: [a, b]\n").unwrap_err();
        assert!(err.to_string().contains("tags"));
    }

    #[test]
    fn test_missing_file_is_dataset_not_found() {
        let err = load_dataset(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, InfrastructureError::DatasetNotFound(_)));
    }
}
