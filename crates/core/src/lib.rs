pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod taxonomy;

use std::sync::Arc;

use errors::CoreError;
use models::{
    account::{AccountBalance, AccountSummary},
    classified::{Classification, ClassifiedPortfolio, ClassifiedPosition},
    holding::Holding,
    position::{InstrumentType, Position, Provenance},
    reconciliation::ReconcileOutcome,
};
use services::{
    account_summary::{AccountSummaryService, InflationGuard},
    aggregator::Aggregator,
    classifier::Classifier,
    reconciler::Reconciler,
};
use storage::traits::HoldingsStore;
use taxonomy::Taxonomy;

/// Main entry point for the Portfolio Lens core library.
///
/// Owns the taxonomy reference data, the four engines (classifier,
/// aggregator, reconciler, account-summary recalculator), and a handle to
/// the holdings store. One instance serves all users/accounts; the methods
/// are synchronous per batch — reconciliation runs for the *same* account
/// must not overlap (serialize them in the caller).
#[must_use]
pub struct PortfolioLens {
    taxonomy: Taxonomy,
    classifier: Classifier,
    aggregator: Aggregator,
    reconciler: Reconciler,
    summary_service: AccountSummaryService,
    store: Arc<dyn HoldingsStore>,
}

impl std::fmt::Debug for PortfolioLens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioLens")
            .field("asset_classes", &self.taxonomy.classes().len())
            .finish()
    }
}

impl PortfolioLens {
    /// Build with the curated built-in taxonomy and default guard config.
    pub fn new(store: Arc<dyn HoldingsStore>) -> Self {
        Self::with_taxonomy(store, Taxonomy::builtin())
    }

    /// Build with a custom taxonomy (fixtures, versioned reference data).
    pub fn with_taxonomy(store: Arc<dyn HoldingsStore>, taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            classifier: Classifier::new(),
            aggregator: Aggregator::new(),
            reconciler: Reconciler::new(),
            summary_service: AccountSummaryService::new(),
            store,
        }
    }

    /// Override the inflation-guard thresholds.
    pub fn with_inflation_guard(mut self, guard: InflationGuard) -> Self {
        self.summary_service = AccountSummaryService::with_guard(guard);
        self
    }

    // ── Ingestion ───────────────────────────────────────────────────

    /// Full ingestion cycle for one account: reconcile the snapshot into the
    /// ledger, then recompute and persist the account summary.
    ///
    /// `trust_external_total` bypasses the inflation guard for accounts
    /// whose positions are deliberately tracked elsewhere.
    pub async fn ingest_snapshot(
        &self,
        user_id: &str,
        account_id: &str,
        positions: &[Position],
        balance: Option<&AccountBalance>,
        provenance: &Provenance,
        trust_external_total: bool,
    ) -> Result<ReconcileOutcome, CoreError> {
        let outcome = self
            .reconcile_account(user_id, account_id, positions, provenance)
            .await?;

        let holdings = self.store.holdings_for_account(account_id).await?;
        let summary =
            self.summary_service
                .recompute(account_id, &holdings, balance, trust_external_total);
        self.store.save_account_summary(&summary).await?;

        Ok(outcome)
    }

    /// Reconcile only, without touching the account summary.
    pub async fn reconcile_account(
        &self,
        user_id: &str,
        account_id: &str,
        positions: &[Position],
        provenance: &Provenance,
    ) -> Result<ReconcileOutcome, CoreError> {
        let existing = self.store.holdings_for_account(account_id).await?;
        Ok(self
            .reconciler
            .reconcile(
                self.store.as_ref(),
                user_id,
                account_id,
                &existing,
                positions,
                provenance,
            )
            .await)
    }

    /// Recompute and persist one account's summary from its current ledger.
    pub async fn recompute_account_summary(
        &self,
        account_id: &str,
        balance: Option<&AccountBalance>,
        trust_external_total: bool,
    ) -> Result<AccountSummary, CoreError> {
        let holdings = self.store.holdings_for_account(account_id).await?;
        let summary =
            self.summary_service
                .recompute(account_id, &holdings, balance, trust_external_total);
        self.store.save_account_summary(&summary).await?;
        Ok(summary)
    }

    // ── Classification & Aggregation ────────────────────────────────

    /// Classify a single position's identity against the taxonomy.
    #[must_use]
    pub fn classify(
        &self,
        symbol: &str,
        instrument_type: InstrumentType,
        description: Option<&str>,
    ) -> Classification {
        self.classifier
            .classify(&self.taxonomy, symbol, instrument_type, description)
    }

    /// Build the consolidated portfolio view: the union of a user's open
    /// holdings across all accounts, classified and rolled up together with
    /// the supplied account balances. Read-time projection, never persisted.
    pub async fn portfolio_view(
        &self,
        user_id: &str,
        accounts: &[AccountBalance],
    ) -> Result<ClassifiedPortfolio, CoreError> {
        let holdings = self.store.all_holdings(user_id).await?;
        let classified: Vec<ClassifiedPosition> = holdings
            .iter()
            .filter(|h| h.is_open())
            .map(|holding| {
                let position = Position::from(holding);
                let classification = self.classifier.classify(
                    &self.taxonomy,
                    &position.symbol,
                    position.asset_type,
                    position.description.as_deref(),
                );
                ClassifiedPosition::new(position, classification)
            })
            .collect();

        Ok(self.aggregator.aggregate(&self.taxonomy, classified, accounts))
    }

    /// The portfolio view serialized to pretty JSON, for debugging and for
    /// frontends that consume the projection as-is.
    pub async fn portfolio_view_json(
        &self,
        user_id: &str,
        accounts: &[AccountBalance],
    ) -> Result<String, CoreError> {
        let view = self.portfolio_view(user_id, accounts).await?;
        Ok(serde_json::to_string_pretty(&view)?)
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Most recently persisted summary for an account, if any.
    pub async fn account_summary(
        &self,
        account_id: &str,
    ) -> Result<Option<AccountSummary>, CoreError> {
        self.store.account_summary(account_id).await
    }

    /// All ledger rows for an account, open and closed (audit view).
    pub async fn account_holdings(&self, account_id: &str) -> Result<Vec<Holding>, CoreError> {
        self.store.holdings_for_account(account_id).await
    }

    /// The taxonomy in use (UI legends, drill-down labels).
    #[must_use]
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }
}
