use serde::{Deserialize, Serialize};

// ============ Input Models ============

/// One row of an uploaded transaction file.
///
/// Text fields are kept as they appeared in the file (trimmed). Blank cells
/// are `None`, mirroring a missing value in the source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionRecord {
    /// Transaction date. Only presence of the column is checked.
    pub date: Option<String>,
    /// Free-text category, e.g. "Credit Card Payment".
    pub transaction_type: Option<String>,
    /// Signed amount. `None` when the cell was blank.
    pub amount: Option<f64>,
    /// Loan or credit card account identifier.
    pub account_name: Option<String>,
    /// Raw "Paid On Time" cell.
    pub paid_on_time: Option<String>,
    /// Raw "Credit Limit" cell, when the column exists.
    pub credit_limit: Option<String>,
}

impl TransactionRecord {
    /// A record is credit-type when its type contains "credit", ignoring case.
    pub fn is_credit(&self) -> bool {
        self.transaction_type
            .as_deref()
            .map(|t| t.to_lowercase().contains("credit"))
            .unwrap_or(false)
    }

    /// Normalized on-time flag. Anything outside the truthy set is late.
    pub fn is_paid_on_time(&self) -> bool {
        self.paid_on_time
            .as_deref()
            .map(|raw| {
                matches!(
                    raw.trim().to_lowercase().as_str(),
                    "true" | "1" | "yes" | "y"
                )
            })
            .unwrap_or(false)
    }
}

/// Ordered rows of one upload, all sharing the same header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSet {
    /// Whether the optional "Credit Limit" column was present in the header.
    pub has_credit_limit: bool,
    pub records: Vec<TransactionRecord>,
}

impl TransactionSet {
    pub fn new(records: Vec<TransactionRecord>, has_credit_limit: bool) -> Self {
        Self {
            has_credit_limit,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============ Computed Models ============

/// Intermediate aggregates the score is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditAnalysis {
    pub late_payments: u64,
    /// Sum of `Amount` over credit-type rows.
    pub outstanding_credit: f64,
    /// Resolved credit limit, never below the fallback when the column is unusable.
    pub total_limit: f64,
    /// Unrounded utilization percentage.
    pub credit_utilization_percent: f64,
    /// Distinct account names (not time-windowed).
    pub new_accounts_last_year: u64,
}

/// Metrics returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Synthetic score, always within 300..=850.
    pub score: u32,
    pub late_payments: u64,
    /// Utilization rounded to 2 decimal places.
    pub credit_utilization_percent: f64,
    pub new_accounts_last_year: u64,
}

// ============ Response Models ============

/// Success payload of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub rows: usize,
    pub metrics: MetricsResult,
}

impl UploadResponse {
    pub fn ok(rows: usize, metrics: MetricsResult) -> Self {
        Self {
            status: "ok".to_string(),
            rows,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: Option<&str>, paid: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            transaction_type: kind.map(str::to_string),
            paid_on_time: paid.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_credit_classification_is_case_insensitive() {
        assert!(record(Some("Credit Card Payment"), None).is_credit());
        assert!(record(Some("MY CREDITLINE"), None).is_credit());
        assert!(record(Some("discredited"), None).is_credit());
        assert!(!record(Some("Home Loan EMI"), None).is_credit());
        assert!(!record(None, None).is_credit());
    }

    #[test]
    fn test_paid_on_time_truthy_set() {
        for raw in ["true", "TRUE", "True", "1", "yes", "Yes", "y", "Y", " yes "] {
            assert!(record(None, Some(raw)).is_paid_on_time(), "{raw:?}");
        }
        for raw in ["false", "0", "no", "n", "", "maybe", "1.0", "on time"] {
            assert!(!record(None, Some(raw)).is_paid_on_time(), "{raw:?}");
        }
        assert!(!record(None, None).is_paid_on_time());
    }

    #[test]
    fn test_upload_response_shape() {
        let response = UploadResponse::ok(
            3,
            MetricsResult {
                score: 620,
                late_payments: 1,
                credit_utilization_percent: 40.0,
                new_accounts_last_year: 2,
            },
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": "ok",
                "rows": 3,
                "metrics": {
                    "score": 620,
                    "late_payments": 1,
                    "credit_utilization_percent": 40.0,
                    "new_accounts_last_year": 2
                }
            })
        );
    }
}
