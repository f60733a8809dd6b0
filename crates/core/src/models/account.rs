use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of an account, as reported by the upstream normalizer.
///
/// Drives two things: whether the account's balance lands in the cash or the
/// liability bucket during aggregation, and whether the inflation guard
/// applies when recomputing the account summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    Brokerage,
    Banking,
    Credit,
    Loan,
    RealEstate,
    /// Manually tracked accounts with no live connection
    Offline,
}

impl AccountCategory {
    /// Credit and loan accounts contribute to the liability bucket,
    /// not the cash bucket.
    #[must_use]
    pub fn is_liability(&self) -> bool {
        matches!(self, AccountCategory::Credit | AccountCategory::Loan)
    }

    /// Position-backed categories are expected to hold ledger rows; an
    /// externally reported total with no backing positions is suspect there.
    /// Banking/credit/loan/real-estate balances are the account, so their
    /// reported totals are always trusted.
    #[must_use]
    pub fn is_position_backed(&self) -> bool {
        matches!(self, AccountCategory::Brokerage | AccountCategory::Offline)
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountCategory::Brokerage => write!(f, "brokerage"),
            AccountCategory::Banking => write!(f, "banking"),
            AccountCategory::Credit => write!(f, "credit"),
            AccountCategory::Loan => write!(f, "loan"),
            AccountCategory::RealEstate => write!(f, "real_estate"),
            AccountCategory::Offline => write!(f, "offline"),
        }
    }
}

/// Normalized account-level balance record supplied alongside a positions
/// snapshot. All monetary fields are optional — absence means the source did
/// not report them, not zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Settled cash in the account
    pub cash_balance: Option<f64>,

    /// Externally reported total account value.
    /// Negative for liability accounts. Potentially untrustworthy when the
    /// account has no backing positions (see the inflation guard).
    pub liquidation_value: Option<f64>,

    /// Funds available to trade, when the source reports it
    pub buying_power: Option<f64>,

    pub category: AccountCategory,
}

impl AccountBalance {
    pub fn new(category: AccountCategory) -> Self {
        Self {
            cash_balance: None,
            liquidation_value: None,
            buying_power: None,
            category,
        }
    }

    pub fn with_cash(mut self, cash_balance: f64) -> Self {
        self.cash_balance = Some(cash_balance);
        self
    }

    pub fn with_liquidation_value(mut self, liquidation_value: f64) -> Self {
        self.liquidation_value = Some(liquidation_value);
        self
    }
}

/// Recomputed account-level totals, persisted on the account record after
/// every reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: String,

    /// Sum of market values of positive-quantity holdings
    pub equity_value: f64,

    /// Copied from the balance record when supplied
    pub cash_balance: Option<f64>,

    /// Copied from the balance record when supplied
    pub buying_power: Option<f64>,

    /// Number of open (positive-quantity) holdings
    pub holdings_count: usize,

    /// Total account value after the inflation guard has been applied
    pub total_value: f64,

    pub last_synced: DateTime<Utc>,
}
