//! Standing conditional rules and their evaluation against the rate matrix.

pub mod evaluation;
pub mod registry;
pub mod rule;
