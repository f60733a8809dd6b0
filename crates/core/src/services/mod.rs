pub mod account_summary;
pub mod aggregator;
pub mod classifier;
pub mod reconciler;
