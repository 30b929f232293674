// vigil-core/src/domain/customer/record.rs

use serde::{Deserialize, Serialize};

use crate::domain::customer::snapshot::{FieldValue, Snapshot};
use crate::domain::error::DomainError;

pub const CUSTOMER_ID: &str = "customer_id";
pub const CHURN_RISK_SCORE: &str = "churn_risk_score";
pub const SUPPORT_TICKETS: &str = "support_tickets_last_30d";
pub const PAYMENT_DELAY_DAYS: &str = "avg_payment_delay_days";
pub const PRODUCT_ADOPTION_SCORE: &str = "product_adoption_score";
pub const MONTHLY_REVENUE: &str = "monthly_revenue_usd";

/// Typed view over the fields every rule and the impact model rely on.
/// Any other snapshot column stays opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub churn_risk_score: f64,
    pub support_tickets_last_30d: f64,
    pub avg_payment_delay_days: f64,
    pub product_adoption_score: f64,
    pub monthly_revenue_usd: f64,
}

impl Snapshot {
    /// Resolves every row into a `CustomerRecord`, in row order.
    /// The first row with a missing or non-numeric required field aborts resolution.
    pub fn customers(&self) -> Result<Vec<CustomerRecord>, DomainError> {
        (0..self.row_count())
            .map(|row| CustomerRecord::resolve(self, row))
            .collect()
    }
}

impl CustomerRecord {
    fn resolve(snapshot: &Snapshot, row: usize) -> Result<Self, DomainError> {
        let customer_id = resolve_id(snapshot, row)?;
        let number = |field: &str| -> Result<f64, DomainError> {
            cell(snapshot, row, field)
                .and_then(FieldValue::as_number)
                .ok_or_else(|| DomainError::MissingField {
                    record: customer_id.clone(),
                    field: field.to_string(),
                })
        };

        Ok(Self {
            churn_risk_score: number(CHURN_RISK_SCORE)?,
            support_tickets_last_30d: number(SUPPORT_TICKETS)?,
            avg_payment_delay_days: number(PAYMENT_DELAY_DAYS)?,
            product_adoption_score: number(PRODUCT_ADOPTION_SCORE)?,
            monthly_revenue_usd: number(MONTHLY_REVENUE)?,
            customer_id,
        })
    }
}

fn cell<'a>(snapshot: &'a Snapshot, row: usize, field: &str) -> Option<&'a FieldValue> {
    snapshot
        .column_index(field)
        .map(|idx| &snapshot.rows()[row][idx])
}

fn resolve_id(snapshot: &Snapshot, row: usize) -> Result<String, DomainError> {
    match cell(snapshot, row, CUSTOMER_ID) {
        Some(FieldValue::Text(id)) if !id.trim().is_empty() => Ok(id.clone()),
        // Numeric identifiers are common in exported sheets
        Some(FieldValue::Number(n)) if n.is_finite() && n.fract() == 0.0 => {
            Ok(format!("{}", *n as i64))
        }
        _ => Err(DomainError::MissingField {
            record: format!("#{}", row + 1),
            field: CUSTOMER_ID.to_string(),
        }),
    }
}
