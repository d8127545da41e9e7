pub mod balance;
pub mod config;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod routes;
pub mod schemas;
pub mod split;
pub mod store;
pub mod validation;

pub use balance::compute_balances;
pub use exchange::{compute_transactions, settle};
pub use split::resolve_shares;
