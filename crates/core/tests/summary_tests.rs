// ═══════════════════════════════════════════════════════════════════
// Account Summary Tests — equity/cash/total recomputation and the
// reported-total inflation guard
// ═══════════════════════════════════════════════════════════════════

use chrono::Utc;

use portfolio_lens_core::models::account::{AccountBalance, AccountCategory};
use portfolio_lens_core::models::holding::Holding;
use portfolio_lens_core::models::position::{DataSource, InstrumentType, Position, Provenance};
use portfolio_lens_core::services::account_summary::{AccountSummaryService, InflationGuard};

const ACCOUNT: &str = "acct-1";

fn holding(symbol: &str, quantity: f64, market_value: f64) -> Holding {
    let position = Position::new(symbol, InstrumentType::Equity, quantity)
        .with_market_value(market_value);
    Holding::from_position(
        "user-1",
        ACCOUNT,
        &position,
        &Provenance::new(DataSource::Brokerage, "seed"),
        Utc::now(),
    )
}

fn balance(category: AccountCategory, cash: f64, liquidation: f64) -> AccountBalance {
    AccountBalance::new(category)
        .with_cash(cash)
        .with_liquidation_value(liquidation)
}

// ═══════════════════════════════════════════════════════════════════
// Basic recomputation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn equity_sums_only_positive_quantity_holdings() {
    let mut closed = holding("TSLA", 5.0, 900.0);
    closed.close(&Provenance::new(DataSource::Brokerage, "x"), Utc::now());
    let holdings = vec![holding("AAPL", 10.0, 1_000.0), closed];

    let summary = AccountSummaryService::new().recompute(ACCOUNT, &holdings, None, false);
    assert_eq!(summary.equity_value, 1_000.0);
    assert_eq!(summary.holdings_count, 1);
}

#[test]
fn no_balance_record_means_equity_plus_null_safe_cash() {
    let holdings = vec![holding("AAPL", 10.0, 1_000.0)];
    let summary = AccountSummaryService::new().recompute(ACCOUNT, &holdings, None, false);
    assert_eq!(summary.total_value, 1_000.0);
    assert_eq!(summary.cash_balance, None);
    assert_eq!(summary.buying_power, None);
}

#[test]
fn cash_and_buying_power_copied_from_balance_record() {
    let holdings = vec![holding("AAPL", 10.0, 1_000.0)];
    let mut record = balance(AccountCategory::Brokerage, 250.0, 1_250.0);
    record.buying_power = Some(500.0);

    let summary =
        AccountSummaryService::new().recompute(ACCOUNT, &holdings, Some(&record), false);
    assert_eq!(summary.cash_balance, Some(250.0));
    assert_eq!(summary.buying_power, Some(500.0));
    assert_eq!(summary.total_value, 1_250.0);
}

#[test]
fn reported_total_trusted_when_positions_back_it() {
    let holdings = vec![holding("AAPL", 10.0, 1_000.0)];
    let record = balance(AccountCategory::Brokerage, 0.0, 50_000.0);
    let summary =
        AccountSummaryService::new().recompute(ACCOUNT, &holdings, Some(&record), false);
    // Holdings exist, so even a wildly different reported value is trusted.
    assert_eq!(summary.total_value, 50_000.0);
}

// ═══════════════════════════════════════════════════════════════════
// Inflation guard
// ═══════════════════════════════════════════════════════════════════

#[test]
fn guard_fires_for_positionless_brokerage_account() {
    let record = balance(AccountCategory::Brokerage, 100.0, 50_000.0);
    let summary = AccountSummaryService::new().recompute(ACCOUNT, &[], Some(&record), false);
    assert_eq!(summary.total_value, 100.0);
}

#[test]
fn guard_does_not_fire_for_real_estate_account() {
    let record = balance(AccountCategory::RealEstate, 100.0, 50_000.0);
    let summary = AccountSummaryService::new().recompute(ACCOUNT, &[], Some(&record), false);
    assert_eq!(summary.total_value, 50_000.0);
}

#[test]
fn guard_bypassed_when_external_total_is_trusted() {
    let record = balance(AccountCategory::Brokerage, 100.0, 50_000.0);
    let summary = AccountSummaryService::new().recompute(ACCOUNT, &[], Some(&record), true);
    assert_eq!(summary.total_value, 50_000.0);
}

#[test]
fn guard_ignores_reported_values_at_or_below_the_floor() {
    let record = balance(AccountCategory::Brokerage, 0.0, 900.0);
    let summary = AccountSummaryService::new().recompute(ACCOUNT, &[], Some(&record), false);
    assert_eq!(summary.total_value, 900.0);
}

#[test]
fn guard_tolerates_mismatch_within_the_band() {
    // Computed 40k, reported 50k: band = max(50% × 40k, 1k) = 20k, diff 10k.
    let record = balance(AccountCategory::Brokerage, 40_000.0, 50_000.0);
    let summary = AccountSummaryService::new().recompute(ACCOUNT, &[], Some(&record), false);
    assert_eq!(summary.total_value, 50_000.0);
}

#[test]
fn guard_fires_on_large_negative_reported_value() {
    let record = balance(AccountCategory::Offline, 100.0, -50_000.0);
    let summary = AccountSummaryService::new().recompute(ACCOUNT, &[], Some(&record), false);
    assert_eq!(summary.total_value, 100.0);
}

#[test]
fn guard_thresholds_are_configuration() {
    let service = AccountSummaryService::with_guard(InflationGuard {
        min_reported: 100_000.0,
        relative_band: 0.5,
        absolute_band: 1_000.0,
    });
    // Below the raised floor: trusted even with no positions.
    let record = balance(AccountCategory::Brokerage, 100.0, 50_000.0);
    let summary = service.recompute(ACCOUNT, &[], Some(&record), false);
    assert_eq!(summary.total_value, 50_000.0);
}
