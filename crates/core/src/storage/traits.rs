use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::account::AccountSummary;
use crate::models::holding::Holding;

/// Trait abstraction over the holdings ledger's persistence backend.
///
/// The reconciler and facade only ever talk to this trait; embedders plug in
/// a database-backed implementation, tests use [`super::memory::MemoryStore`].
/// Swapping the backend never touches the business logic.
#[async_trait]
pub trait HoldingsStore: Send + Sync {
    /// All ledger rows for one account, open and closed.
    async fn holdings_for_account(&self, account_id: &str) -> Result<Vec<Holding>, CoreError>;

    /// All ledger rows across every account owned by a user
    /// (the consolidated-view read path).
    async fn all_holdings(&self, user_id: &str) -> Result<Vec<Holding>, CoreError>;

    /// Bulk-insert brand-new ledger rows as one atomic operation.
    async fn insert_holdings(&self, holdings: &[Holding]) -> Result<(), CoreError>;

    /// Rewrite one existing ledger row in full. Rows touched within one
    /// reconciliation run are disjoint, so implementations need no ordering
    /// guarantee between concurrent updates.
    async fn update_holding(&self, holding: &Holding) -> Result<(), CoreError>;

    /// Persist recomputed account-level totals.
    async fn save_account_summary(&self, summary: &AccountSummary) -> Result<(), CoreError>;

    /// The most recently persisted totals for an account, if any.
    async fn account_summary(&self, account_id: &str) -> Result<Option<AccountSummary>, CoreError>;
}
