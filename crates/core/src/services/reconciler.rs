use std::collections::HashMap;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::models::holding::Holding;
use crate::models::position::{Position, Provenance};
use crate::models::reconciliation::{
    ChangeKind, PositionState, ReconcileOutcome, ReconciliationChange,
};
use crate::storage::traits::HoldingsStore;

/// Tolerance for quantity/value comparisons; snapshot values round-trip
/// through JSON, so exact float equality is too strict.
const EPSILON: f64 = 1e-9;

/// How many holding updates may be in flight at once within one run.
const UPDATE_CONCURRENCY: usize = 10;

/// Merges an incoming positions snapshot into an account's holdings ledger:
/// detects new, changed, and closed positions, persists the diff, and emits
/// a changelog.
///
/// Operates on full-snapshot batches. Reconciliation runs for different
/// accounts are independent; runs for the *same* account must be serialized
/// by the caller — the diff is computed against the ledger snapshot passed
/// in, so overlapping runs on one account risk lost updates.
pub struct Reconciler {
    update_concurrency: usize,
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            update_concurrency: UPDATE_CONCURRENCY,
        }
    }

    /// Override the bounded update pool size (tests use 1 to prove the
    /// logical outcome is independent of batching).
    pub fn with_update_concurrency(update_concurrency: usize) -> Self {
        Self {
            update_concurrency: update_concurrency.max(1),
        }
    }

    /// Reconcile one account's ledger against an incoming snapshot.
    ///
    /// Emits exactly one change per symbol, by fixed precedence:
    /// new > quantity-changed > value-changed > unchanged. An empty incoming
    /// batch means "no data available", not "everything closed" — closure
    /// detection is skipped entirely so a failed upstream parse can never
    /// zero out an account.
    ///
    /// Individual write failures are logged and skipped; `upserted` and
    /// `closed` count successes only. Safe to retry idempotently, since the
    /// diff is a full-snapshot operation.
    pub async fn reconcile(
        &self,
        store: &dyn HoldingsStore,
        user_id: &str,
        account_id: &str,
        existing: &[Holding],
        incoming: &[Position],
        provenance: &Provenance,
    ) -> ReconcileOutcome {
        let now = Utc::now();
        let deduped = dedup_by_symbol(incoming);

        let existing_by_symbol: HashMap<&str, &Holding> = existing
            .iter()
            .map(|h| (h.symbol.as_str(), h))
            .collect();

        let mut changes: Vec<ReconciliationChange> = Vec::new();
        let mut inserts: Vec<Holding> = Vec::new();
        let mut updates: Vec<Holding> = Vec::new();

        for position in &deduped {
            match existing_by_symbol.get(position.symbol.as_str()) {
                None => {
                    changes.push(ReconciliationChange {
                        kind: ChangeKind::NewPosition,
                        symbol: position.symbol.clone(),
                        account_id: account_id.to_string(),
                        previous: None,
                        current: Some(snapshot_state(position)),
                    });
                    inserts.push(Holding::from_position(
                        user_id, account_id, position, provenance, now,
                    ));
                }
                Some(holding) => {
                    let quantity_changed =
                        (holding.quantity - position.quantity).abs() > EPSILON;
                    let value_changed = match (position.market_value, holding.market_value) {
                        (Some(new), Some(old)) => (new - old).abs() > EPSILON,
                        (Some(_), None) => true,
                        (None, _) => false,
                    };

                    if quantity_changed {
                        changes.push(ReconciliationChange {
                            kind: ChangeKind::QuantityChange,
                            symbol: position.symbol.clone(),
                            account_id: account_id.to_string(),
                            previous: Some(ledger_state(holding)),
                            current: Some(snapshot_state(position)),
                        });
                    } else if value_changed {
                        changes.push(ReconciliationChange {
                            kind: ChangeKind::ValueUpdate,
                            symbol: position.symbol.clone(),
                            account_id: account_id.to_string(),
                            previous: Some(ledger_state(holding)),
                            current: Some(snapshot_state(position)),
                        });
                    }

                    // Unchanged rows are still refreshed with the latest
                    // price/valuation metadata and provenance.
                    let mut updated = (*holding).clone();
                    updated.apply_position(position, provenance, now);
                    updates.push(updated);
                }
            }
        }

        // Closure detection: only meaningful for a full snapshot. An empty
        // deduped set skips this entirely.
        let mut closures: Vec<Holding> = Vec::new();
        if !deduped.is_empty() {
            let incoming_symbols: std::collections::HashSet<&str> =
                deduped.iter().map(|p| p.symbol.as_str()).collect();
            for holding in existing {
                if holding.quantity > 0.0 && !incoming_symbols.contains(holding.symbol.as_str()) {
                    changes.push(ReconciliationChange {
                        kind: ChangeKind::ClosedPosition,
                        symbol: holding.symbol.clone(),
                        account_id: account_id.to_string(),
                        previous: Some(ledger_state(holding)),
                        current: None,
                    });
                    let mut closed = holding.clone();
                    closed.close(provenance, now);
                    closures.push(closed);
                }
            }
        }

        // Persist: one atomic bulk insert for new rows, then bounded
        // concurrent updates. The logical outcome is identical to running
        // every write sequentially.
        let mut upserted = 0;
        if !inserts.is_empty() {
            match store.insert_holdings(&inserts).await {
                Ok(()) => upserted += inserts.len(),
                Err(e) => warn!(
                    account_id,
                    count = inserts.len(),
                    error = %e,
                    "bulk insert of new holdings failed; skipping"
                ),
            }
        }
        upserted += self.write_updates(store, &updates).await;
        let closed = self.write_updates(store, &closures).await;

        debug!(
            account_id,
            incoming = incoming.len(),
            deduped = deduped.len(),
            changes = changes.len(),
            upserted,
            closed,
            provenance = %provenance.tag,
            "reconciliation run complete"
        );

        ReconcileOutcome {
            changes,
            upserted,
            closed,
        }
    }

    /// Run holding updates in chunks of at most `update_concurrency` in
    /// flight at once. Returns the number of successful writes; failures
    /// are logged and skipped.
    async fn write_updates(&self, store: &dyn HoldingsStore, rows: &[Holding]) -> usize {
        let mut succeeded = 0;
        for chunk in rows.chunks(self.update_concurrency) {
            let results = join_all(chunk.iter().map(|h| store.update_holding(h))).await;
            for (holding, result) in chunk.iter().zip(results) {
                match result {
                    Ok(()) => succeeded += 1,
                    Err(e) => warn!(
                        symbol = %holding.symbol,
                        account_id = %holding.account_id,
                        error = %e,
                        "holding update failed; skipping"
                    ),
                }
            }
        }
        succeeded
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse duplicate symbols in an incoming batch (e.g. a position split
/// across statement pages) into one position each, preserving first-seen
/// order. Additive fields are summed; point-in-time fields (price per share,
/// average cost) take the last seen value. Symbols are uppercased here so
/// the diff keys match the ledger.
///
/// Skipping this step double-counts holdings, so the reconciler always runs
/// it before diffing.
pub fn dedup_by_symbol(incoming: &[Position]) -> Vec<Position> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, Position> = HashMap::new();

    for position in incoming {
        let symbol = position.symbol.to_uppercase();
        match merged.get_mut(&symbol) {
            Some(acc) => merge_into(acc, position),
            None => {
                let mut first = position.clone();
                first.symbol = symbol.clone();
                merged.insert(symbol.clone(), first);
                order.push(symbol);
            }
        }
    }

    order
        .into_iter()
        .filter_map(|symbol| merged.remove(&symbol))
        .collect()
}

fn merge_into(acc: &mut Position, next: &Position) {
    // Additive across pages
    acc.quantity += next.quantity;
    acc.short_quantity += next.short_quantity;
    acc.market_value = sum_opt(acc.market_value, next.market_value);
    acc.cost_basis = sum_opt(acc.cost_basis, next.cost_basis);
    acc.current_day_profit_loss =
        sum_opt(acc.current_day_profit_loss, next.current_day_profit_loss);

    // Point-in-time: last seen wins
    if next.price.is_some() {
        acc.price = next.price;
    }
    if next.average_price.is_some() {
        acc.average_price = next.average_price;
    }
    if next.current_day_profit_loss_percentage.is_some() {
        acc.current_day_profit_loss_percentage = next.current_day_profit_loss_percentage;
    }
    if next.description.is_some() {
        acc.description = next.description.clone();
    }
}

/// `None + None = None`; otherwise missing operands count as zero.
fn sum_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        _ => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

fn snapshot_state(position: &Position) -> PositionState {
    PositionState {
        quantity: position.quantity,
        market_value: position.market_value,
    }
}

fn ledger_state(holding: &Holding) -> PositionState {
    PositionState {
        quantity: holding.quantity,
        market_value: holding.market_value,
    }
}
