use chrono::Utc;
use tracing::debug;

use crate::models::account::{AccountBalance, AccountSummary};
use crate::models::holding::Holding;

/// Thresholds for the reported-total inflation guard.
///
/// The exact values are inherited from the original system and preserved for
/// behavioral parity; they are configuration, not logic, so embedders can
/// tune them.
#[derive(Debug, Clone, PartialEq)]
pub struct InflationGuard {
    /// Reported totals at or below this magnitude are always trusted.
    pub min_reported: f64,
    /// Relative half of the mismatch band: fraction of the computed value.
    pub relative_band: f64,
    /// Absolute half of the mismatch band, in dollars.
    pub absolute_band: f64,
}

impl Default for InflationGuard {
    fn default() -> Self {
        Self {
            min_reported: 1_000.0,
            relative_band: 0.5,
            absolute_band: 1_000.0,
        }
    }
}

/// Recomputes account-level totals (equity, cash, buying power, total value)
/// from the reconciled ledger plus an optional balance record.
///
/// The guard exists because document-extracted balance records sometimes
/// report a hallucinated or multi-account-aggregated total; without backing
/// positions, a large reported value that disagrees wildly with the computed
/// one is replaced by the computed value, silently and deterministically.
pub struct AccountSummaryService {
    guard: InflationGuard,
}

impl AccountSummaryService {
    pub fn new() -> Self {
        Self {
            guard: InflationGuard::default(),
        }
    }

    pub fn with_guard(guard: InflationGuard) -> Self {
        Self { guard }
    }

    /// Recompute the summary for one account.
    ///
    /// - Equity: sum of market values over positive-quantity holdings.
    /// - Cash / buying power: copied from the balance record when present.
    /// - Total: the reported liquidation value, unless the inflation guard
    ///   fires — then equity + cash wins. No balance record at all means
    ///   total = equity + cash (cash null-safe).
    ///
    /// `trust_external_total` bypasses the guard, for accounts whose
    /// positions are deliberately tracked in a separate aggregate account.
    #[must_use]
    pub fn recompute(
        &self,
        account_id: &str,
        holdings: &[Holding],
        balance: Option<&AccountBalance>,
        trust_external_total: bool,
    ) -> AccountSummary {
        let open: Vec<&Holding> = holdings.iter().filter(|h| h.quantity > 0.0).collect();
        let equity_value: f64 = open.iter().filter_map(|h| h.market_value).sum();
        let holdings_count = open.len();

        let cash_balance = balance.and_then(|b| b.cash_balance);
        let buying_power = balance.and_then(|b| b.buying_power);
        let computed = equity_value + cash_balance.unwrap_or(0.0);

        let total_value = match balance {
            Some(b) => match b.liquidation_value {
                Some(reported) => {
                    if self.guard_fires(b, reported, computed, holdings_count, trust_external_total)
                    {
                        debug!(
                            account_id,
                            reported,
                            computed,
                            "inflation guard fired; using computed total"
                        );
                        computed
                    } else {
                        reported
                    }
                }
                None => computed,
            },
            None => computed,
        };

        AccountSummary {
            account_id: account_id.to_string(),
            equity_value,
            cash_balance,
            buying_power,
            holdings_count,
            total_value,
            last_synced: Utc::now(),
        }
    }

    /// The guard fires only when every condition holds: no backing
    /// positions, a position-backed account category, no explicit trust
    /// flag, a reported magnitude above the floor, and a mismatch beyond
    /// max(relative band × computed, absolute band).
    fn guard_fires(
        &self,
        balance: &AccountBalance,
        reported: f64,
        computed: f64,
        holdings_count: usize,
        trust_external_total: bool,
    ) -> bool {
        if holdings_count > 0
            || !balance.category.is_position_backed()
            || trust_external_total
            || reported.abs() <= self.guard.min_reported
        {
            return false;
        }
        let band = (computed * self.guard.relative_band)
            .abs()
            .max(self.guard.absolute_band);
        (reported - computed).abs() > band
    }
}

impl Default for AccountSummaryService {
    fn default() -> Self {
        Self::new()
    }
}
