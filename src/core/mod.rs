pub mod currency;
pub mod error;
pub mod ledger;
pub mod order;
