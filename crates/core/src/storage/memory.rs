use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::account::AccountSummary;
use crate::models::holding::Holding;

use super::traits::HoldingsStore;

/// In-memory ledger store, keyed by holding id.
///
/// Used by tests and by embedders that keep the ledger in process memory
/// (e.g. a UI prototype without a database). Safe for concurrent use from
/// one reconciliation run's bounded update pool.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    holdings: HashMap<Uuid, Holding>,
    summaries: HashMap<String, AccountSummary>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-existing ledger rows (test fixtures).
    pub async fn seed(&self, holdings: Vec<Holding>) {
        let mut inner = self.inner.write().await;
        for holding in holdings {
            inner.holdings.insert(holding.id, holding);
        }
    }

    /// Total number of ledger rows, open and closed.
    pub async fn holding_count(&self) -> usize {
        self.inner.read().await.holdings.len()
    }
}

#[async_trait]
impl HoldingsStore for MemoryStore {
    async fn holdings_for_account(&self, account_id: &str) -> Result<Vec<Holding>, CoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Holding> = inner
            .holdings
            .values()
            .filter(|h| h.account_id == account_id)
            .cloned()
            .collect();
        // Deterministic order regardless of map iteration
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(rows)
    }

    async fn all_holdings(&self, user_id: &str) -> Result<Vec<Holding>, CoreError> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Holding> = inner
            .holdings
            .values()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.account_id
                .cmp(&b.account_id)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        Ok(rows)
    }

    async fn insert_holdings(&self, holdings: &[Holding]) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        for holding in holdings {
            inner.holdings.insert(holding.id, holding.clone());
        }
        Ok(())
    }

    async fn update_holding(&self, holding: &Holding) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        match inner.holdings.get_mut(&holding.id) {
            Some(existing) => {
                *existing = holding.clone();
                Ok(())
            }
            None => Err(CoreError::HoldingNotFound(format!(
                "{} ({})",
                holding.symbol, holding.id
            ))),
        }
    }

    async fn save_account_summary(&self, summary: &AccountSummary) -> Result<(), CoreError> {
        let mut inner = self.inner.write().await;
        inner
            .summaries
            .insert(summary.account_id.clone(), summary.clone());
        Ok(())
    }

    async fn account_summary(&self, account_id: &str) -> Result<Option<AccountSummary>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner.summaries.get(account_id).cloned())
    }
}
