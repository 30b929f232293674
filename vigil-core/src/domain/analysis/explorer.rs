// vigil-core/src/domain/analysis/explorer.rs

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::domain::analysis::model::{
    ColumnMap, ColumnSummary, Correlation, DataExplorationResult, round_to,
};
use crate::domain::analysis::stats::{RunningStats, pearson};
use crate::domain::customer::{FieldValue, Snapshot};

/// Profiles the snapshot: null ratios, numeric summaries and the pairwise
/// correlations whose magnitude reaches the threshold.
pub struct DataExplorer;

impl DataExplorer {
    #[instrument(skip(snapshot), fields(rows = snapshot.row_count(), columns = snapshot.columns().len()))]
    pub fn run(snapshot: &Snapshot, correlation_threshold: f64) -> DataExplorationResult {
        let columns = snapshot.columns().to_vec();
        let row_count = snapshot.row_count();

        let null_ratio_by_column = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let nulls = snapshot
                    .column_values(idx)
                    .filter(|v| v.is_missing())
                    .count();
                let ratio = if row_count == 0 {
                    0.0
                } else {
                    nulls as f64 / row_count as f64
                };
                (name.clone(), ratio)
            })
            .collect::<ColumnMap<_>>();

        let numeric: Vec<usize> = (0..columns.len())
            .filter(|&idx| is_numeric_column(snapshot, idx))
            .collect();
        debug!(numeric_columns = numeric.len(), "Numeric columns selected");

        // Per-column statistics, fanned out across the rayon pool
        let summaries: Vec<(String, ColumnSummary)> = numeric
            .par_iter()
            .map(|&idx| {
                let stats: RunningStats = snapshot
                    .column_values(idx)
                    .filter_map(FieldValue::as_number)
                    .collect();
                (
                    columns[idx].clone(),
                    ColumnSummary {
                        mean: stats.mean(),
                        std: stats.population_std(),
                        min: stats.min(),
                        max: stats.max(),
                    },
                )
            })
            .collect();
        let numeric_summary: ColumnMap<ColumnSummary> = summaries.into_iter().collect();

        // Upper triangle only: every unordered pair once, `a` declared before `b`
        let pairs: Vec<(usize, usize)> = numeric
            .iter()
            .enumerate()
            .flat_map(|(pos, &a)| numeric[pos + 1..].iter().map(move |&b| (a, b)))
            .collect();

        let meaningful_correlations: Vec<Correlation> = pairs
            .par_iter()
            .filter_map(|&(a, b)| {
                let observations: Vec<(f64, f64)> = snapshot
                    .rows()
                    .iter()
                    .filter_map(|row| Some((row[a].as_number()?, row[b].as_number()?)))
                    .collect();
                let coefficient = pearson(&observations)?;

                (coefficient.abs() >= correlation_threshold).then(|| Correlation {
                    column_a: columns[a].clone(),
                    column_b: columns[b].clone(),
                    coefficient: round_to(coefficient, 4),
                })
            })
            .collect();

        debug!(
            correlations = meaningful_correlations.len(),
            "Correlation scan finished"
        );

        DataExplorationResult {
            row_count,
            columns,
            null_ratio_by_column,
            numeric_summary,
            meaningful_correlations,
        }
    }
}

/// Numeric = at least one finite number, and no non-null value of another kind.
fn is_numeric_column(snapshot: &Snapshot, idx: usize) -> bool {
    let mut has_number = false;
    for value in snapshot.column_values(idx) {
        match value {
            FieldValue::Null => {}
            FieldValue::Number(n) => has_number |= n.is_finite(),
            FieldValue::Bool(_) | FieldValue::Text(_) => return false,
        }
    }
    has_number
}
