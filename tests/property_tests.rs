/// Property-based tests using proptest
/// Tests invariants of the scoring formula that should hold for all inputs
use cibil_advisor::metrics::{compute_metrics, score, DEFAULT_CREDIT_LIMIT};
use cibil_advisor::models::{CreditAnalysis, TransactionRecord, TransactionSet};
use proptest::prelude::*;

fn analysis(late: u64, utilization: f64, accounts: u64) -> CreditAnalysis {
    CreditAnalysis {
        late_payments: late,
        outstanding_credit: utilization * DEFAULT_CREDIT_LIMIT / 100.0,
        total_limit: DEFAULT_CREDIT_LIMIT,
        credit_utilization_percent: utilization,
        new_accounts_last_year: accounts,
    }
}

fn arb_record() -> impl Strategy<Value = TransactionRecord> {
    (
        prop::option::of(prop::sample::select(vec![
            "Credit Card",
            "credit card payment",
            "Home Loan EMI",
            "Personal Loan",
            "",
        ])),
        prop::option::of(-1_000_000.0f64..1_000_000.0),
        prop::option::of("[A-Z][a-z]{0,3}"),
        prop::option::of(prop::sample::select(vec![
            "yes", "no", "Y", "n", "true", "FALSE", "1", "0", "late",
        ])),
        prop::option::of(prop_oneof![
            (-100_000.0f64..500_000.0).prop_map(|v| v.to_string()),
            Just("n/a".to_string()),
        ]),
    )
        .prop_map(|(kind, amount, account, paid, limit)| TransactionRecord {
            date: Some("2024-01-01".to_string()),
            transaction_type: kind.map(str::to_string),
            amount,
            account_name: account,
            paid_on_time: paid.map(str::to_string),
            credit_limit: limit,
        })
}

// Property: score always stays within the published range
proptest! {
    #[test]
    fn score_always_in_range(
        records in prop::collection::vec(arb_record(), 0..40),
        has_limit in proptest::bool::ANY
    ) {
        let set = TransactionSet::new(records, has_limit);
        let metrics = compute_metrics(&set);
        prop_assert!((300..=850).contains(&metrics.score), "score {}", metrics.score);
    }

    #[test]
    fn score_in_range_for_any_aggregates(
        late in 0u64..1_000,
        utilization in -10_000.0f64..10_000.0,
        accounts in 0u64..1_000
    ) {
        let s = score(&analysis(late, utilization, accounts));
        prop_assert!((300..=850).contains(&s));
    }

    #[test]
    fn late_payments_counted_exactly(
        records in prop::collection::vec(arb_record(), 0..40)
    ) {
        let expected = records.iter().filter(|r| !r.is_paid_on_time()).count() as u64;
        let metrics = compute_metrics(&TransactionSet::new(records, false));
        prop_assert_eq!(metrics.late_payments, expected);
    }
}

// Property: more late payments never raise the score
proptest! {
    #[test]
    fn extra_late_payment_never_increases_score(
        late in 0u64..30,
        utilization in 0.0f64..200.0,
        accounts in 0u64..30
    ) {
        let before = score(&analysis(late, utilization, accounts));
        let after = score(&analysis(late + 1, utilization, accounts));
        prop_assert!(after <= before, "{} -> {}", before, after);
    }

    #[test]
    fn extra_account_never_increases_score(
        late in 0u64..30,
        utilization in 0.0f64..200.0,
        accounts in 0u64..30
    ) {
        let before = score(&analysis(late, utilization, accounts));
        let after = score(&analysis(late, utilization, accounts + 1));
        prop_assert!(after <= before);
    }
}

// Property: utilization penalty threshold
proptest! {
    #[test]
    fn utilization_up_to_20_percent_is_free(
        late in 1u64..5,
        utilization in 0.0f64..=20.0
    ) {
        // With late payments there is no bonus, so only the penalty could move the score.
        prop_assert_eq!(
            score(&analysis(late, utilization, 0)),
            score(&analysis(late, 0.0, 0))
        );
    }

    #[test]
    fn utilization_above_20_percent_costs_two_points_each(
        whole_points in 1u32..100
    ) {
        let utilization = 20.0 + whole_points as f64;
        let expected = (700 - 30) as i64 - 2 * whole_points as i64;
        let expected = expected.clamp(300, 850) as u32;
        prop_assert_eq!(score(&analysis(1, utilization, 0)), expected);
    }

    #[test]
    fn bonus_only_below_30_percent(
        utilization in 0.0f64..100.0
    ) {
        let with_clean_history = score(&analysis(0, utilization, 0)) as i64;
        let with_one_late = score(&analysis(1, utilization, 0)) as i64;
        // One late payment costs 30 points, plus the 50 point bonus when eligible.
        let expected_gap = if utilization < 30.0 { 80 } else { 30 };
        prop_assert_eq!(with_clean_history - with_one_late, expected_gap);
    }
}
