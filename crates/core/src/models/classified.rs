use serde::{Deserialize, Serialize};

use super::position::Position;

/// The classifier's verdict for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Asset-class id from the taxonomy (e.g. "crypto")
    pub asset_class_id: String,

    /// Sub-asset-class id, when the class-scoped second pass matched
    /// (e.g. "bitcoin_etf")
    pub sub_class_id: Option<String>,

    /// Human-readable sub-category label (e.g. "Bitcoin ETF", "NVDA Option")
    pub sub_category_label: Option<String>,
}

impl Classification {
    pub fn class(asset_class_id: impl Into<String>) -> Self {
        Self {
            asset_class_id: asset_class_id.into(),
            sub_class_id: None,
            sub_category_label: None,
        }
    }
}

/// A position enriched with its classification and its share of total
/// portfolio market value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPosition {
    pub position: Position,
    pub asset_class_id: String,
    pub sub_class_id: Option<String>,
    pub sub_category_label: Option<String>,
    /// Share of total portfolio value, in percent; filled by the aggregator
    pub allocation_pct: f64,
}

impl ClassifiedPosition {
    pub fn new(position: Position, classification: Classification) -> Self {
        Self {
            position,
            asset_class_id: classification.asset_class_id,
            sub_class_id: classification.sub_class_id,
            sub_category_label: classification.sub_category_label,
            allocation_pct: 0.0,
        }
    }

    /// Market value with absence treated as zero (aggregation arithmetic).
    #[must_use]
    pub fn market_value(&self) -> f64 {
        self.position.market_value.unwrap_or(0.0)
    }
}

/// One asset class's roll-up in the portfolio view.
///
/// `market_value` includes any non-position contribution folded into the
/// class (cash balances into "Cash", liability balances into "Debt").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassSummary {
    pub class_id: String,
    pub class_name: String,
    pub market_value: f64,
    pub day_change: f64,
    pub allocation_pct: f64,
    /// Position count, plus one for a nonzero folded-in cash/liability bucket
    pub holding_count: usize,
    /// Sorted by descending absolute market value
    pub positions: Vec<ClassifiedPosition>,
}

/// The consolidated, read-time portfolio projection consumed by the
/// dashboard. Never persisted — recomputed on demand from current holdings
/// plus account balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPortfolio {
    pub total_value: f64,
    pub day_change: f64,
    pub day_change_pct: f64,
    /// Number of individual positions (pseudo cash/debt buckets excluded)
    pub holding_count: usize,
    pub cash_value: f64,
    pub cash_pct: f64,
    pub liability_value: f64,
    pub liability_pct: f64,
    pub classes: Vec<AssetClassSummary>,
    /// Herfindahl–Hirschman index over individual position allocations
    pub concentration_hhi: f64,
    /// 1–10, derived from HHI; higher is more diversified
    pub diversification_score: u8,
    /// 4% of total value, annually
    pub safe_withdrawal_annual: f64,
}

impl ClassifiedPortfolio {
    /// Well-formed zero portfolio for degenerate input.
    /// An empty portfolio gets the maximum diversification score by
    /// convention (HHI of zero).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_value: 0.0,
            day_change: 0.0,
            day_change_pct: 0.0,
            holding_count: 0,
            cash_value: 0.0,
            cash_pct: 0.0,
            liability_value: 0.0,
            liability_pct: 0.0,
            classes: Vec::new(),
            concentration_hhi: 0.0,
            diversification_score: 10,
            safe_withdrawal_annual: 0.0,
        }
    }
}
