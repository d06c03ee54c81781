use crate::core::currency::{validate_pair, Amount, CurrencyId};
use crate::core::error::{ExchangeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single proposed trade: give `sell_amount` of one currency for
/// `buy_amount` of another.
///
/// Orders are transient. They are applied into the rate matrix's staging
/// accumulators and not retained afterwards. The forward and reverse rates
/// are computed once at construction.
///
/// # Examples
///
/// ```
/// use mm7::core::currency::CurrencyId;
/// use mm7::core::order::Order;
///
/// let order = Order::new(CurrencyId::new(3), 10.0, CurrencyId::new(2), 20.0).unwrap();
/// assert_eq!(order.rate(), 0.5);
/// assert_eq!(order.inverse_rate(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    sell_id: CurrencyId,
    sell_amount: Amount,
    buy_id: CurrencyId,
    buy_amount: Amount,
    /// `sell_amount / buy_amount`
    rate: f64,
    /// `1 / rate`
    inverse_rate: f64,
}

impl Order {
    /// Create an order, deriving its rate and inverse rate.
    ///
    /// Both amounts must be finite and positive and must differ from each
    /// other; the two legs must name different currencies.
    pub fn new(
        sell_id: CurrencyId,
        sell_amount: Amount,
        buy_id: CurrencyId,
        buy_amount: Amount,
    ) -> Result<Self> {
        validate_pair(sell_id, buy_id)?;
        for (amount, leg) in [(sell_amount, "sell"), (buy_amount, "buy")] {
            if !(amount.is_finite() && amount > 0.0) {
                return Err(ExchangeError::invariant(format!(
                    "order {leg} amount must be finite and positive, got {amount}"
                )));
            }
        }
        if sell_amount == buy_amount {
            return Err(ExchangeError::invariant(format!(
                "order sell and buy amounts must differ, both are {sell_amount}"
            )));
        }
        let rate = sell_amount / buy_amount;
        Ok(Self {
            sell_id,
            sell_amount,
            buy_id,
            buy_amount,
            rate,
            inverse_rate: 1.0 / rate,
        })
    }

    // --- Accessors ---

    pub fn sell_id(&self) -> CurrencyId {
        self.sell_id
    }

    pub fn sell_amount(&self) -> Amount {
        self.sell_amount
    }

    pub fn buy_id(&self) -> CurrencyId {
        self.buy_id
    }

    pub fn buy_amount(&self) -> Amount {
        self.buy_amount
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn inverse_rate(&self) -> f64 {
        self.inverse_rate
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.sell_id, self.sell_amount, self.buy_id, self.buy_amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_derives_rates() {
        let order = Order::new(CurrencyId::new(3), 10.0, CurrencyId::new(2), 20.0).unwrap();
        assert_eq!(order.sell_id(), CurrencyId::new(3));
        assert_eq!(order.buy_id(), CurrencyId::new(2));
        assert_eq!(order.sell_amount(), 10.0);
        assert_eq!(order.buy_amount(), 20.0);
        assert_eq!(order.rate(), 0.5);
        assert_eq!(order.inverse_rate(), 2.0);
    }

    #[test]
    fn test_order_equal_amounts_rejected() {
        let result = Order::new(CurrencyId::new(0), 5.0, CurrencyId::new(1), 5.0);
        assert!(matches!(result, Err(ExchangeError::InvariantViolation(_))));
    }

    #[test]
    fn test_order_non_positive_amounts_rejected() {
        assert!(Order::new(CurrencyId::new(0), 0.0, CurrencyId::new(1), 5.0).is_err());
        assert!(Order::new(CurrencyId::new(0), 5.0, CurrencyId::new(1), -2.0).is_err());
        assert!(Order::new(CurrencyId::new(0), f64::NAN, CurrencyId::new(1), 2.0).is_err());
    }

    #[test]
    fn test_order_self_pair_rejected() {
        assert!(Order::new(CurrencyId::new(1), 5.0, CurrencyId::new(1), 2.0).is_err());
    }

    #[test]
    fn test_order_display() {
        let order = Order::new(CurrencyId::new(3), 10.0, CurrencyId::new(2), 20.0).unwrap();
        assert_eq!(order.to_string(), "3:10 -> 2:20");
    }
}
