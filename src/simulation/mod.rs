pub mod random_market;
pub mod scenario;
