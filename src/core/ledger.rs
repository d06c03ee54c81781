use crate::core::currency::{validate_amount, Amount, CurrencyId};
use crate::core::error::{allocate, Result};
use serde::Serialize;

/// Real balance held in each currency of the exchange.
///
/// The ledger is dense: one slot per currency id, all starting at zero.
/// Withdrawals are clamped to the available balance, so no slot ever
/// goes negative.
///
/// # Examples
///
/// ```
/// use mm7::core::currency::CurrencyId;
/// use mm7::core::ledger::BalanceLedger;
///
/// let mut ledger = BalanceLedger::new(2).unwrap();
/// let usd = CurrencyId::new(0);
/// ledger.deposit(usd, 50.0).unwrap();
///
/// // Only 50 is available, so only 50 comes out.
/// assert_eq!(ledger.withdraw(usd, 80.0).unwrap(), 50.0);
/// assert_eq!(ledger.balance(usd).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceLedger {
    amounts: Vec<Amount>,
}

impl BalanceLedger {
    /// Create a ledger of `currencies` zeroed balances.
    pub fn new(currencies: usize) -> Result<Self> {
        Ok(Self {
            amounts: allocate(currencies, 0.0, "balance ledger")?,
        })
    }

    /// Number of currencies tracked.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn balance(&self, id: CurrencyId) -> Result<Amount> {
        let idx = id.check(self.len())?;
        Ok(self.amounts[idx])
    }

    pub fn balances(&self) -> &[Amount] {
        &self.amounts
    }

    /// Add `amount` to the balance of `id`. There is no upper bound.
    pub fn deposit(&mut self, id: CurrencyId, amount: Amount) -> Result<()> {
        let idx = id.check(self.len())?;
        let amount = validate_amount(amount, "deposit")?;
        self.amounts[idx] = validate_amount(self.amounts[idx] + amount, "resulting balance")?;
        Ok(())
    }

    /// Remove up to `amount` from the balance of `id`.
    ///
    /// Returns what was actually removed: `min(amount, balance)`.
    pub fn withdraw(&mut self, id: CurrencyId, amount: Amount) -> Result<Amount> {
        let idx = id.check(self.len())?;
        let amount = validate_amount(amount, "withdrawal")?;
        let taken = amount.min(self.amounts[idx]);
        self.amounts[idx] -= taken;
        Ok(taken)
    }

    /// Overwrite the balance of `id`. Used for seeding.
    pub fn set_balance(&mut self, id: CurrencyId, amount: Amount) -> Result<()> {
        let idx = id.check(self.len())?;
        self.amounts[idx] = validate_amount(amount, "balance")?;
        Ok(())
    }

    /// Whether the ledger holds at least `amount` of `id`.
    pub fn covers(&self, id: CurrencyId, amount: Amount) -> Result<bool> {
        Ok(self.balance(id)? >= amount)
    }

    /// Sum of all balances, regardless of denomination.
    pub fn total(&self) -> Amount {
        self.amounts.iter().sum()
    }
}
