use crate::core::currency::{validate_amount, validate_pair, Amount, CurrencyId};
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a strategy compares the live rate against its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    /// Match when `rate <= target`.
    Le,
    /// Match when `rate >= target`.
    Ge,
}

impl Comparator {
    pub fn matches(self, rate: f64, target: f64) -> bool {
        match self {
            Comparator::Le => rate <= target,
            Comparator::Ge => rate >= target,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Le => write!(f, "<="),
            Comparator::Ge => write!(f, ">="),
        }
    }
}

/// A standing rule: when the live `sell -> buy` rate satisfies
/// `comparator` against `target_rate`, stage `sell_volume`/`buy_volume`
/// on that pair.
///
/// Strategies are immutable once created.
///
/// # Examples
///
/// ```
/// use mm7::core::currency::CurrencyId;
/// use mm7::strategy::rule::{Comparator, Strategy};
///
/// let rule = Strategy::new(
///     CurrencyId::new(1),
///     CurrencyId::new(0),
///     Comparator::Le,
///     1.0,
///     5.0,
///     5.0,
/// )
/// .unwrap();
/// assert!(rule.is_triggered_by(0.9));
/// assert!(!rule.is_triggered_by(1.1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    sell_id: CurrencyId,
    buy_id: CurrencyId,
    comparator: Comparator,
    target_rate: f64,
    sell_volume: Amount,
    buy_volume: Amount,
}

impl Strategy {
    pub fn new(
        sell_id: CurrencyId,
        buy_id: CurrencyId,
        comparator: Comparator,
        target_rate: f64,
        sell_volume: Amount,
        buy_volume: Amount,
    ) -> Result<Self> {
        validate_pair(sell_id, buy_id)?;
        validate_amount(target_rate, "strategy target rate")?;
        validate_amount(sell_volume, "strategy sell volume")?;
        validate_amount(buy_volume, "strategy buy volume")?;
        Ok(Self {
            sell_id,
            buy_id,
            comparator,
            target_rate,
            sell_volume,
            buy_volume,
        })
    }

    pub fn is_triggered_by(&self, rate: f64) -> bool {
        self.comparator.matches(rate, self.target_rate)
    }

    // --- Accessors ---

    pub fn sell_id(&self) -> CurrencyId {
        self.sell_id
    }

    pub fn buy_id(&self) -> CurrencyId {
        self.buy_id
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn target_rate(&self) -> f64 {
        self.target_rate
    }

    pub fn sell_volume(&self) -> Amount {
        self.sell_volume
    }

    pub fn buy_volume(&self) -> Amount {
        self.buy_volume
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{} when rate {} {}: stage {}/{}",
            self.sell_id,
            self.buy_id,
            self.comparator,
            self.target_rate,
            self.sell_volume,
            self.buy_volume
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_boundaries() {
        assert!(Comparator::Le.matches(1.0, 1.0));
        assert!(Comparator::Ge.matches(1.0, 1.0));
        assert!(Comparator::Le.matches(0.5, 1.0));
        assert!(!Comparator::Ge.matches(0.5, 1.0));
        assert!(!Comparator::Le.matches(f64::NAN, 1.0));
    }

    #[test]
    fn test_comparator_serde() {
        let json = serde_json::to_string(&Comparator::Ge).unwrap();
        assert_eq!(json, "\"ge\"");
        let parsed: Comparator = serde_json::from_str("\"le\"").unwrap();
        assert_eq!(parsed, Comparator::Le);
    }

    #[test]
    fn test_strategy_rejects_bad_input() {
        let (a, b) = (CurrencyId::new(0), CurrencyId::new(1));
        assert!(Strategy::new(a, a, Comparator::Le, 1.0, 1.0, 1.0).is_err());
        assert!(Strategy::new(a, b, Comparator::Le, -1.0, 1.0, 1.0).is_err());
        assert!(Strategy::new(a, b, Comparator::Le, 1.0, -1.0, 1.0).is_err());
        assert!(Strategy::new(a, b, Comparator::Le, 1.0, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_strategy_display() {
        let rule = Strategy::new(
            CurrencyId::new(1),
            CurrencyId::new(0),
            Comparator::Ge,
            1.5,
            10.0,
            15.0,
        )
        .unwrap();
        assert_eq!(rule.to_string(), "1->0 when rate >= 1.5: stage 10/15");
    }
}
