pub mod account;
pub mod classified;
pub mod holding;
pub mod position;
pub mod reconciliation;
