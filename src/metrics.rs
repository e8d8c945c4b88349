/// Credit metrics computed from an uploaded transaction set
///
/// Scoring starts from a baseline and applies:
/// 1. A penalty per late payment
/// 2. A penalty for credit utilization above 20%
/// 3. A penalty per distinct account
/// 4. A bonus for no late payments and utilization under 30%
///
/// The result is clamped to 300..=850.
use crate::models::{CreditAnalysis, MetricsResult, TransactionSet};
use std::collections::HashSet;
use std::fmt;

/// Limit used when the "Credit Limit" column is absent or unusable.
pub const DEFAULT_CREDIT_LIMIT: f64 = 100_000.0;

pub const BASE_SCORE: f64 = 700.0;
pub const MIN_SCORE: f64 = 300.0;
pub const MAX_SCORE: f64 = 850.0;

const LATE_PAYMENT_PENALTY: f64 = 30.0;
const UTILIZATION_FREE_PERCENT: f64 = 20.0;
const UTILIZATION_PENALTY_PER_POINT: f64 = 2.0;
const ACCOUNT_PENALTY: f64 = 5.0;
const CLEAN_HISTORY_BONUS: f64 = 50.0;
const CLEAN_HISTORY_MAX_UTILIZATION: f64 = 30.0;

/// Computes the client-facing metrics for a transaction set.
///
/// Total over any structurally valid set, including the empty one.
pub fn compute_metrics(set: &TransactionSet) -> MetricsResult {
    let analysis = analyze(set);

    MetricsResult {
        score: score(&analysis),
        late_payments: analysis.late_payments,
        credit_utilization_percent: round2(analysis.credit_utilization_percent),
        new_accounts_last_year: analysis.new_accounts_last_year,
    }
}

/// Aggregates the set into the inputs of the scoring formula.
pub fn analyze(set: &TransactionSet) -> CreditAnalysis {
    let late_payments = set
        .records
        .iter()
        .filter(|r| !r.is_paid_on_time())
        .count() as u64;

    let outstanding_credit: f64 = set
        .records
        .iter()
        .filter(|r| r.is_credit())
        .filter_map(|r| r.amount)
        .sum();

    let total_limit = resolve_total_limit(set);

    let credit_utilization_percent = if total_limit != 0.0 {
        outstanding_credit / total_limit * 100.0
    } else {
        0.0
    };

    let new_accounts_last_year = set
        .records
        .iter()
        .filter_map(|r| r.account_name.as_deref())
        .filter(|name| !name.is_empty())
        .collect::<HashSet<_>>()
        .len() as u64;

    CreditAnalysis {
        late_payments,
        outstanding_credit,
        total_limit,
        credit_utilization_percent,
        new_accounts_last_year,
    }
}

/// Sums "Credit Limit" over credit-type rows.
///
/// Falls back to [`DEFAULT_CREDIT_LIMIT`] when the column is absent, when any
/// non-blank cell fails to parse, or when the sum is not positive.
pub fn resolve_total_limit(set: &TransactionSet) -> f64 {
    if !set.has_credit_limit {
        return DEFAULT_CREDIT_LIMIT;
    }

    let mut total = 0.0;
    for raw in set
        .records
        .iter()
        .filter(|r| r.is_credit())
        .filter_map(|r| r.credit_limit.as_deref())
        .filter(|raw| !raw.is_empty())
    {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => total += value,
            _ => {
                tracing::debug!(
                    "Unparsable credit limit {:?}, using default of {}",
                    raw,
                    DEFAULT_CREDIT_LIMIT
                );
                return DEFAULT_CREDIT_LIMIT;
            }
        }
    }

    if total > 0.0 {
        total
    } else {
        DEFAULT_CREDIT_LIMIT
    }
}

/// Applies the scoring formula. Uses the unrounded utilization.
pub fn score(analysis: &CreditAnalysis) -> u32 {
    let utilization = analysis.credit_utilization_percent;

    let mut raw = BASE_SCORE;
    raw -= analysis.late_payments as f64 * LATE_PAYMENT_PENALTY;
    raw -= (utilization - UTILIZATION_FREE_PERCENT).max(0.0) * UTILIZATION_PENALTY_PER_POINT;
    raw -= analysis.new_accounts_last_year as f64 * ACCOUNT_PENALTY;

    if analysis.late_payments == 0 && utilization < CLEAN_HISTORY_MAX_UTILIZATION {
        raw += CLEAN_HISTORY_BONUS;
    }

    // f64::max discards NaN, so a degenerate score lands on the floor.
    raw.max(MIN_SCORE).min(MAX_SCORE) as u32
}

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Health band shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 750 {
            ScoreBand::Excellent
        } else if score >= 650 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreBand::Excellent => write!(f, "Excellent"),
            ScoreBand::Good => write!(f, "Good"),
            ScoreBand::NeedsImprovement => write!(f, "Needs Improvement"),
        }
    }
}
