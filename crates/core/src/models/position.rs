use serde::{Deserialize, Serialize};

/// The instrument type of a normalized position.
/// Determines which classification rules apply (options routing, fund fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentType {
    /// Individual stocks (AAPL, JPM, etc.)
    Equity,
    /// Exchange-traded funds
    Etf,
    /// Mutual funds
    MutualFund,
    /// Collective investment trusts (401k-style pooled funds)
    CollectiveInvestment,
    /// Options contracts (classified by their underlying)
    Option,
    /// Bonds, notes, and other fixed income
    FixedIncome,
    /// Money-market and sweep instruments
    CashEquivalent,
    /// Anything the upstream normalizer could not map
    Unknown,
}

impl InstrumentType {
    /// True for mutual funds and collective investment trusts —
    /// the fund fallback tier of the classifier.
    #[must_use]
    pub fn is_fund(&self) -> bool {
        matches!(
            self,
            InstrumentType::MutualFund | InstrumentType::CollectiveInvestment
        )
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstrumentType::Equity => write!(f, "Equity"),
            InstrumentType::Etf => write!(f, "ETF"),
            InstrumentType::MutualFund => write!(f, "Mutual Fund"),
            InstrumentType::CollectiveInvestment => write!(f, "Collective Investment"),
            InstrumentType::Option => write!(f, "Option"),
            InstrumentType::FixedIncome => write!(f, "Fixed Income"),
            InstrumentType::CashEquivalent => write!(f, "Cash Equivalent"),
            InstrumentType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Where an ingestion batch came from.
/// Recorded on every holding row the batch touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Direct brokerage API sync
    Brokerage,
    /// Open-banking aggregator sync
    OpenBanking,
    /// LLM-extracted document upload
    Document,
    /// Manually entered by the user
    Manual,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Brokerage => write!(f, "brokerage"),
            DataSource::OpenBanking => write!(f, "open_banking"),
            DataSource::Document => write!(f, "document"),
            DataSource::Manual => write!(f, "manual"),
        }
    }
}

/// Identifies one ingestion event: which kind of source produced it and a
/// free-text tag (e.g. an upload id) stored on every touched holding row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source: DataSource,
    /// Free-text pointer to the ingestion event (upload id, sync id, ...)
    pub tag: String,
}

impl Provenance {
    pub fn new(source: DataSource, tag: impl Into<String>) -> Self {
        Self {
            source,
            tag: tag.into(),
        }
    }
}

/// One normalized position from an ingestion batch.
///
/// Supplied uniformly regardless of source (brokerage API, open-banking sync,
/// or document extraction). Ephemeral — the reconciler turns these into
/// persisted `Holding` rows. Missing numeric fields stay `None`; downstream
/// arithmetic decides explicitly how to treat absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Ticker symbol (uppercased by the reconciler's dedup pass)
    pub symbol: String,

    /// Human-readable description (e.g. "Apple Inc.", "iShares Bitcoin Trust")
    pub description: Option<String>,

    /// Instrument type as reported by the source
    pub asset_type: InstrumentType,

    /// Units held long
    pub quantity: f64,

    /// Units held short
    pub short_quantity: f64,

    /// Average cost per unit (point-in-time, not additive across pages)
    pub average_price: Option<f64>,

    /// Current price per unit (point-in-time, not additive across pages)
    pub price: Option<f64>,

    /// Total cost basis for the lot
    pub cost_basis: Option<f64>,

    /// Current market value of the position
    pub market_value: Option<f64>,

    /// Today's absolute profit/loss
    pub current_day_profit_loss: Option<f64>,

    /// Today's profit/loss as a percentage
    pub current_day_profit_loss_percentage: Option<f64>,
}

impl Position {
    /// Minimal constructor for the common case; optional fields start empty.
    pub fn new(symbol: impl Into<String>, asset_type: InstrumentType, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            description: None,
            asset_type,
            quantity,
            short_quantity: 0.0,
            average_price: None,
            price: None,
            cost_basis: None,
            market_value: None,
            current_day_profit_loss: None,
            current_day_profit_loss_percentage: None,
        }
    }

    pub fn with_market_value(mut self, market_value: f64) -> Self {
        self.market_value = Some(market_value);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_day_change(mut self, absolute: f64, percentage: f64) -> Self {
        self.current_day_profit_loss = Some(absolute);
        self.current_day_profit_loss_percentage = Some(percentage);
        self
    }
}
