use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::position::{InstrumentType, Position, Provenance};

/// One persisted (account, symbol) ledger row.
///
/// **Invariant**: at most one active row per (account, symbol). Closed
/// positions are driven to zero quantity rather than deleted, so the audit
/// trail survives reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier
    pub id: Uuid,

    /// Owning user
    pub user_id: String,

    /// Owning account
    pub account_id: String,

    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Display name (from the position's description)
    pub name: Option<String>,

    pub instrument_type: InstrumentType,

    /// Sub-classification reported by the source, when any
    pub instrument_subtype: Option<String>,

    /// Units held long; zero for closed positions
    pub quantity: f64,

    /// Units held short
    pub short_quantity: f64,

    pub cost_basis: Option<f64>,

    /// Average cost per unit
    pub average_price: Option<f64>,

    /// Price per unit at the last valuation
    pub current_price: Option<f64>,

    pub market_value: Option<f64>,

    /// When the valuation fields were last refreshed
    pub valuation_date: DateTime<Utc>,

    /// Which kind of source produced the last valuation
    pub valuation_source: String,

    pub current_day_profit_loss: Option<f64>,

    pub current_day_profit_loss_percentage: Option<f64>,

    /// Which kind of source created/last wrote this row
    pub data_source: String,

    /// Free-text pointer to the ingestion event that last wrote this row
    /// (e.g. an upload id)
    pub last_updated_from: Option<String>,
}

impl Holding {
    /// Build a brand-new ledger row from a first-sighted position.
    pub fn from_position(
        user_id: impl Into<String>,
        account_id: impl Into<String>,
        position: &Position,
        provenance: &Provenance,
        now: DateTime<Utc>,
    ) -> Self {
        let source = provenance.source.to_string();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            account_id: account_id.into(),
            symbol: position.symbol.clone(),
            name: position.description.clone(),
            instrument_type: position.asset_type,
            instrument_subtype: None,
            quantity: position.quantity,
            short_quantity: position.short_quantity,
            cost_basis: position.cost_basis,
            average_price: position.average_price,
            current_price: position.price,
            market_value: position.market_value,
            valuation_date: now,
            valuation_source: source.clone(),
            current_day_profit_loss: position.current_day_profit_loss,
            current_day_profit_loss_percentage: position.current_day_profit_loss_percentage,
            data_source: source,
            last_updated_from: Some(provenance.tag.clone()),
        }
    }

    /// Refresh every mutable field from a newer snapshot of the same symbol.
    /// Partial updates are not supported: every touched row is fully rewritten.
    pub fn apply_position(
        &mut self,
        position: &Position,
        provenance: &Provenance,
        now: DateTime<Utc>,
    ) {
        self.quantity = position.quantity;
        self.short_quantity = position.short_quantity;
        self.cost_basis = position.cost_basis;
        self.average_price = position.average_price;
        self.current_price = position.price;
        self.market_value = position.market_value;
        self.valuation_date = now;
        self.valuation_source = provenance.source.to_string();
        self.current_day_profit_loss = position.current_day_profit_loss;
        self.current_day_profit_loss_percentage = position.current_day_profit_loss_percentage;
        if position.description.is_some() {
            self.name = position.description.clone();
        }
        self.instrument_type = position.asset_type;
        self.data_source = provenance.source.to_string();
        self.last_updated_from = Some(provenance.tag.clone());
    }

    /// Close the position: quantities and market value go to zero, the row
    /// itself is retained for audit continuity.
    pub fn close(&mut self, provenance: &Provenance, now: DateTime<Utc>) {
        self.quantity = 0.0;
        self.short_quantity = 0.0;
        self.market_value = Some(0.0);
        self.current_day_profit_loss = None;
        self.current_day_profit_loss_percentage = None;
        self.valuation_date = now;
        self.valuation_source = provenance.source.to_string();
        self.last_updated_from = Some(provenance.tag.clone());
    }

    /// True when the row still represents an open position.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.quantity > 0.0 || self.short_quantity > 0.0
    }
}

impl From<&Holding> for Position {
    /// Project a ledger row back into a normalized position, for the
    /// read-time classification/aggregation path.
    fn from(h: &Holding) -> Self {
        Position {
            symbol: h.symbol.clone(),
            description: h.name.clone(),
            asset_type: h.instrument_type,
            quantity: h.quantity,
            short_quantity: h.short_quantity,
            average_price: h.average_price,
            price: h.current_price,
            cost_basis: h.cost_basis,
            market_value: h.market_value,
            current_day_profit_loss: h.current_day_profit_loss,
            current_day_profit_loss_percentage: h.current_day_profit_loss_percentage,
        }
    }
}
