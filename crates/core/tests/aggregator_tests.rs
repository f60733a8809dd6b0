// ═══════════════════════════════════════════════════════════════════
// Aggregator Tests — roll-ups, cash/debt folding, HHI, allocation
// invariants, degenerate input
// ═══════════════════════════════════════════════════════════════════

use portfolio_lens_core::models::account::{AccountBalance, AccountCategory};
use portfolio_lens_core::models::classified::{Classification, ClassifiedPosition};
use portfolio_lens_core::models::position::{InstrumentType, Position};
use portfolio_lens_core::services::aggregator::Aggregator;
use portfolio_lens_core::taxonomy::{class_ids, Taxonomy};

fn pos(symbol: &str, class_id: &str, market_value: f64, day_change: f64) -> ClassifiedPosition {
    let position = Position::new(symbol, InstrumentType::Equity, 1.0)
        .with_market_value(market_value)
        .with_day_change(day_change, 0.0);
    ClassifiedPosition::new(position, Classification::class(class_id))
}

fn aggregate(
    positions: Vec<ClassifiedPosition>,
    accounts: &[AccountBalance],
) -> portfolio_lens_core::models::classified::ClassifiedPortfolio {
    Aggregator::new().aggregate(&Taxonomy::builtin(), positions, accounts)
}

// ═══════════════════════════════════════════════════════════════════
// Totals & buckets
// ═══════════════════════════════════════════════════════════════════

#[test]
fn total_value_includes_positions_cash_and_liabilities() {
    let positions = vec![
        pos("AAPL", class_ids::TECH_EQUITIES, 10_000.0, 0.0),
        pos("SPY", class_ids::NON_TECH_EQUITIES, 5_000.0, 0.0),
    ];
    let accounts = vec![
        AccountBalance::new(AccountCategory::Brokerage).with_cash(2_000.0),
        AccountBalance::new(AccountCategory::Banking).with_cash(3_000.0),
        AccountBalance::new(AccountCategory::Credit).with_liquidation_value(-1_500.0),
    ];

    let portfolio = aggregate(positions, &accounts);
    assert_eq!(portfolio.total_value, 10_000.0 + 5_000.0 + 5_000.0 - 1_500.0);
    assert_eq!(portfolio.cash_value, 5_000.0);
    assert_eq!(portfolio.liability_value, -1_500.0);
    assert_eq!(portfolio.holding_count, 2);
}

#[test]
fn cash_balance_folds_into_cash_class_as_pseudo_holding() {
    let accounts = vec![AccountBalance::new(AccountCategory::Banking).with_cash(4_000.0)];
    let portfolio = aggregate(vec![], &accounts);

    let cash = portfolio
        .classes
        .iter()
        .find(|c| c.class_id == class_ids::CASH)
        .expect("cash class present");
    assert_eq!(cash.market_value, 4_000.0);
    assert_eq!(cash.holding_count, 1);
    assert!(cash.positions.is_empty());
}

#[test]
fn liability_balance_folds_into_debt_class() {
    let accounts = vec![AccountBalance::new(AccountCategory::Loan).with_liquidation_value(-8_000.0)];
    let portfolio = aggregate(vec![], &accounts);

    let debt = portfolio
        .classes
        .iter()
        .find(|c| c.class_id == class_ids::DEBT)
        .expect("debt class present");
    assert_eq!(debt.market_value, -8_000.0);
    assert_eq!(debt.holding_count, 1);
}

#[test]
fn liability_account_cash_does_not_enter_cash_bucket() {
    let accounts = vec![AccountBalance::new(AccountCategory::Credit)
        .with_cash(999.0)
        .with_liquidation_value(-100.0)];
    let portfolio = aggregate(vec![], &accounts);
    assert_eq!(portfolio.cash_value, 0.0);
    assert_eq!(portfolio.liability_value, -100.0);
}

// ═══════════════════════════════════════════════════════════════════
// Allocation invariants
// ═══════════════════════════════════════════════════════════════════

#[test]
fn class_allocations_sum_to_one_hundred_percent() {
    let positions = vec![
        pos("AAPL", class_ids::TECH_EQUITIES, 6_000.0, 0.0),
        pos("GLD", class_ids::PRECIOUS_METALS, 1_000.0, 0.0),
        pos("IBIT", class_ids::CRYPTO, 3_000.0, 0.0),
    ];
    let accounts = vec![
        AccountBalance::new(AccountCategory::Banking).with_cash(2_000.0),
        AccountBalance::new(AccountCategory::Credit).with_liquidation_value(-2_000.0),
    ];

    let portfolio = aggregate(positions, &accounts);
    let sum: f64 = portfolio.classes.iter().map(|c| c.allocation_pct).sum();
    assert!((sum - 100.0).abs() < 1e-9, "allocations sum to {sum}");
}

#[test]
fn returned_classes_are_never_empty() {
    let positions = vec![pos("AAPL", class_ids::TECH_EQUITIES, 1_000.0, 0.0)];
    let portfolio = aggregate(positions, &[]);
    assert!(!portfolio.classes.is_empty());
    for class in &portfolio.classes {
        assert!(
            class.market_value != 0.0 || class.holding_count > 0,
            "class {} is empty",
            class.class_id
        );
    }
    // Only the tech class should have survived.
    assert_eq!(portfolio.classes.len(), 1);
    assert_eq!(portfolio.classes[0].class_id, class_ids::TECH_EQUITIES);
}

#[test]
fn positions_sorted_by_descending_absolute_market_value() {
    let positions = vec![
        pos("SMALL", class_ids::TECH_EQUITIES, 100.0, 0.0),
        pos("SHORTY", class_ids::TECH_EQUITIES, -500.0, 0.0),
        pos("BIG", class_ids::TECH_EQUITIES, 300.0, 0.0),
    ];
    let portfolio = aggregate(positions, &[]);
    let symbols: Vec<&str> = portfolio.classes[0]
        .positions
        .iter()
        .map(|p| p.position.symbol.as_str())
        .collect();
    assert_eq!(symbols, vec!["SHORTY", "BIG", "SMALL"]);
}

// ═══════════════════════════════════════════════════════════════════
// Day change
// ═══════════════════════════════════════════════════════════════════

#[test]
fn day_change_percent_uses_previous_close_denominator() {
    let positions = vec![pos("AAPL", class_ids::TECH_EQUITIES, 1_100.0, 100.0)];
    let portfolio = aggregate(positions, &[]);
    assert_eq!(portfolio.day_change, 100.0);
    // 100 / (1100 - 100) × 100 = 10%
    assert!((portfolio.day_change_pct - 10.0).abs() < 1e-9);
}

#[test]
fn zero_total_value_yields_zero_percentages() {
    let positions = vec![pos("AAPL", class_ids::TECH_EQUITIES, 0.0, 0.0)];
    let portfolio = aggregate(positions, &[]);
    assert_eq!(portfolio.total_value, 0.0);
    assert_eq!(portfolio.day_change_pct, 0.0);
    assert_eq!(portfolio.cash_pct, 0.0);
}

// ═══════════════════════════════════════════════════════════════════
// Concentration metrics
// ═══════════════════════════════════════════════════════════════════

#[test]
fn single_position_portfolio_has_maximum_concentration() {
    let positions = vec![pos("AAPL", class_ids::TECH_EQUITIES, 5_000.0, 0.0)];
    let portfolio = aggregate(positions, &[]);
    assert!((portfolio.concentration_hhi - 10_000.0).abs() < 1e-6);
    assert_eq!(portfolio.diversification_score, 1);
}

#[test]
fn ten_equal_positions_score_nine() {
    let positions: Vec<ClassifiedPosition> = (0..10)
        .map(|i| pos(&format!("SYM{i}"), class_ids::NON_TECH_EQUITIES, 1_000.0, 0.0))
        .collect();
    let portfolio = aggregate(positions, &[]);
    assert!((portfolio.concentration_hhi - 1_000.0).abs() < 1e-6);
    assert_eq!(portfolio.diversification_score, 9);
}

#[test]
fn pseudo_cash_holding_excluded_from_hhi() {
    let positions = vec![pos("AAPL", class_ids::TECH_EQUITIES, 5_000.0, 0.0)];
    let accounts = vec![AccountBalance::new(AccountCategory::Banking).with_cash(5_000.0)];
    let portfolio = aggregate(positions, &accounts);
    // AAPL holds 50% of the total; the cash bucket does not square into HHI.
    assert!((portfolio.concentration_hhi - 2_500.0).abs() < 1e-6);
}

#[test]
fn safe_withdrawal_is_four_percent_of_total() {
    let positions = vec![pos("AAPL", class_ids::TECH_EQUITIES, 100_000.0, 0.0)];
    let portfolio = aggregate(positions, &[]);
    assert_eq!(portfolio.safe_withdrawal_annual, 4_000.0);
}

// ═══════════════════════════════════════════════════════════════════
// Degenerate input
// ═══════════════════════════════════════════════════════════════════

#[test]
fn empty_input_yields_well_formed_zero_portfolio() {
    let portfolio = aggregate(vec![], &[]);
    assert_eq!(portfolio.total_value, 0.0);
    assert_eq!(portfolio.holding_count, 0);
    assert!(portfolio.classes.is_empty());
    assert_eq!(portfolio.concentration_hhi, 0.0);
    assert_eq!(portfolio.diversification_score, 10);
    assert_eq!(portfolio.safe_withdrawal_annual, 0.0);
}
