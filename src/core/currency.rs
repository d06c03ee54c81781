use crate::core::error::{ExchangeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantity denominated in a single currency. Stored amounts are never
/// negative.
pub type Amount = f64;

/// Dense, zero-based currency identifier.
///
/// An exchange configured with `N` currencies accepts ids `0..N`; the id is
/// used directly as an index into the ledger and the rate matrix.
///
/// # Examples
///
/// ```
/// use mm7::core::currency::CurrencyId;
///
/// let usd = CurrencyId::new(0);
/// let brl = CurrencyId::new(1);
/// assert_ne!(usd, brl);
/// assert!(usd.check(2).is_ok());
/// assert!(CurrencyId::new(2).check(2).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CurrencyId(usize);

impl CurrencyId {
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    /// Returns the raw index if it lies below `bound`.
    pub fn check(self, bound: usize) -> Result<usize> {
        if self.0 < bound {
            Ok(self.0)
        } else {
            Err(ExchangeError::Index { id: self.0, bound })
        }
    }
}

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for CurrencyId {
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

/// Rejects negative, NaN and infinite amounts.
pub fn validate_amount(amount: Amount, what: &str) -> Result<Amount> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(ExchangeError::invariant(format!(
            "{what} must be a finite, non-negative amount, got {amount}"
        )))
    }
}

/// Rejects a pair whose two legs name the same currency.
pub fn validate_pair(sell: CurrencyId, buy: CurrencyId) -> Result<()> {
    if sell == buy {
        return Err(ExchangeError::invariant(format!(
            "currency {sell} cannot be exchanged for itself"
        )));
    }
    Ok(())
}
