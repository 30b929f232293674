// vigil-core/src/domain/customer/snapshot.rs

use serde::{Deserialize, Serialize};

/// A single cell of the snapshot. Loaders resolve raw file values into one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Null, or a number that is NaN or infinite.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Number(n) => !n.is_finite(),
            _ => false,
        }
    }
}

/// One fully-materialized set of customer rows.
///
/// Columns keep their first-seen order across all rows; a row that lacks a
/// column holds `FieldValue::Null` in that position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl Snapshot {
    /// Builds a snapshot from rows given as ordered `(column, value)` pairs.
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (String, FieldValue)>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut sparse: Vec<Vec<(usize, FieldValue)>> = Vec::new();

        for row in rows {
            let mut cells = Vec::new();
            for (name, value) in row {
                let idx = match columns.iter().position(|c| *c == name) {
                    Some(idx) => idx,
                    None => {
                        columns.push(name);
                        columns.len() - 1
                    }
                };
                cells.push((idx, value));
            }
            sparse.push(cells);
        }

        let width = columns.len();
        let rows = sparse
            .into_iter()
            .map(|cells| {
                let mut dense = vec![FieldValue::Null; width];
                for (idx, value) in cells {
                    dense[idx] = value;
                }
                dense
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<FieldValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterates over the values of one column, in row order.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &FieldValue> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }
}
