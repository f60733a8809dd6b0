use serde::{Deserialize, Serialize};

/// What kind of difference a reconciliation run detected for one symbol.
///
/// Exactly one change is emitted per symbol per run, chosen by fixed
/// precedence: new > quantity-changed > value-changed > unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Symbol not previously in the ledger
    NewPosition,
    /// Quantity differs from the ledger row (takes precedence over value)
    QuantityChange,
    /// Same quantity, different non-null market value
    ValueUpdate,
    /// Open position absent from a full snapshot
    ClosedPosition,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::NewPosition => write!(f, "new_position"),
            ChangeKind::QuantityChange => write!(f, "quantity_change"),
            ChangeKind::ValueUpdate => write!(f, "value_update"),
            ChangeKind::ClosedPosition => write!(f, "closed_position"),
        }
    }
}

/// Snapshot of quantity + market value on one side of a detected change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionState {
    pub quantity: f64,
    pub market_value: Option<f64>,
}

/// One event describing a detected difference between the ledger and an
/// incoming snapshot. Consumed by the upload-review UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationChange {
    pub kind: ChangeKind,
    pub symbol: String,
    pub account_id: String,
    /// Ledger-side state; `None` for brand-new positions
    pub previous: Option<PositionState>,
    /// Snapshot-side state; `None` for closures
    pub current: Option<PositionState>,
}

/// The result of one reconciliation run.
///
/// `upserted` and `closed` count only *successful* writes — a failed
/// individual write is logged and skipped, never aborting the batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub changes: Vec<ReconciliationChange>,
    pub upserted: usize,
    pub closed: usize,
}

impl ReconcileOutcome {
    fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    /// Number of newly sighted positions ("N new" in review summaries).
    #[must_use]
    pub fn new_positions(&self) -> usize {
        self.count(ChangeKind::NewPosition)
    }

    /// Number of detected closures ("M closed" in review summaries).
    #[must_use]
    pub fn closed_positions(&self) -> usize {
        self.count(ChangeKind::ClosedPosition)
    }

    #[must_use]
    pub fn quantity_changes(&self) -> usize {
        self.count(ChangeKind::QuantityChange)
    }

    #[must_use]
    pub fn value_updates(&self) -> usize {
        self.count(ChangeKind::ValueUpdate)
    }
}
