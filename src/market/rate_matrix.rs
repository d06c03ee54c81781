use crate::core::currency::{validate_amount, validate_pair, Amount, CurrencyId};
use crate::core::error::{allocate, ExchangeError, Result};
use crate::core::order::Order;
use serde::{Deserialize, Serialize};

/// Volume accumulated on a currency pair since the last settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StagedVolume {
    /// Pending amount of the sell-side currency.
    pub sell: Amount,
    /// Pending amount of the buy-side currency.
    pub buy: Amount,
}

impl StagedVolume {
    pub fn new(sell: Amount, buy: Amount) -> Self {
        Self { sell, buy }
    }

    pub fn is_zero(&self) -> bool {
        self.sell == 0.0 && self.buy == 0.0
    }
}

/// One cell of the matrix: the live rate for converting the row currency
/// into the column currency, plus that pair's staged volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RateCell {
    pub current_rate: f64,
    pub staged: StagedVolume,
}

/// `N x N` grid of [`RateCell`]s keyed by `(sell, buy)`.
///
/// Rates are supplied from outside; `(a, b)` and `(b, a)` are independent
/// cells and neither is derived from the other. Self-pairs exist as storage
/// but every mutating call rejects them.
///
/// # Examples
///
/// ```
/// use mm7::core::currency::CurrencyId;
/// use mm7::market::rate_matrix::{RateMatrix, StagedVolume};
///
/// let (usd, eur) = (CurrencyId::new(0), CurrencyId::new(1));
/// let mut matrix = RateMatrix::new(2).unwrap();
/// matrix.set_rate(eur, usd, 0.9).unwrap();
/// matrix.stage(eur, usd, 10.0, 9.0).unwrap();
///
/// assert_eq!(matrix.current_rate(eur, usd).unwrap(), 0.9);
/// assert_eq!(matrix.current_rate(usd, eur).unwrap(), 0.0);
/// assert_eq!(matrix.staged(eur, usd).unwrap(), StagedVolume::new(10.0, 9.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateMatrix {
    /// Row-major: `cells[sell * currencies + buy]`.
    cells: Vec<RateCell>,
    currencies: usize,
}

impl RateMatrix {
    /// Create an `n x n` matrix of zeroed cells.
    pub fn new(currencies: usize) -> Result<Self> {
        let total = currencies
            .checked_mul(currencies)
            .ok_or(ExchangeError::Allocation {
                what: "rate matrix",
                requested: usize::MAX,
            })?;
        Ok(Self {
            cells: allocate(total, RateCell::default(), "rate matrix")?,
            currencies,
        })
    }

    pub fn currencies(&self) -> usize {
        self.currencies
    }

    fn offset(&self, sell: CurrencyId, buy: CurrencyId) -> Result<usize> {
        let row = sell.check(self.currencies)?;
        let col = buy.check(self.currencies)?;
        Ok(row * self.currencies + col)
    }

    /// Offset of a pair that may be written to.
    fn writable_offset(&self, sell: CurrencyId, buy: CurrencyId) -> Result<usize> {
        let offset = self.offset(sell, buy)?;
        validate_pair(sell, buy)?;
        Ok(offset)
    }

    pub fn cell(&self, sell: CurrencyId, buy: CurrencyId) -> Result<&RateCell> {
        let offset = self.offset(sell, buy)?;
        Ok(&self.cells[offset])
    }

    pub fn current_rate(&self, sell: CurrencyId, buy: CurrencyId) -> Result<f64> {
        Ok(self.cell(sell, buy)?.current_rate)
    }

    pub fn staged(&self, sell: CurrencyId, buy: CurrencyId) -> Result<StagedVolume> {
        Ok(self.cell(sell, buy)?.staged)
    }

    /// Overwrite the live rate for `sell -> buy`. The reverse pair is untouched.
    pub fn set_rate(&mut self, sell: CurrencyId, buy: CurrencyId, rate: f64) -> Result<()> {
        let offset = self.writable_offset(sell, buy)?;
        let rate = validate_amount(rate, "exchange rate")?;
        self.cells[offset].current_rate = rate;
        Ok(())
    }

    /// Add volume to the pair's staging accumulators.
    pub fn stage(
        &mut self,
        sell: CurrencyId,
        buy: CurrencyId,
        sell_amount: Amount,
        buy_amount: Amount,
    ) -> Result<()> {
        let offset = self.writable_offset(sell, buy)?;
        let sell_amount = validate_amount(sell_amount, "staged sell volume")?;
        let buy_amount = validate_amount(buy_amount, "staged buy volume")?;
        let staged = &mut self.cells[offset].staged;
        let sell_total = validate_amount(staged.sell + sell_amount, "accumulated sell volume")?;
        let buy_total = validate_amount(staged.buy + buy_amount, "accumulated buy volume")?;
        staged.sell = sell_total;
        staged.buy = buy_total;
        Ok(())
    }

    /// Withdraw volume from the pair's staging accumulators.
    ///
    /// Each field is clamped at zero on its own. Returns the volume actually
    /// removed.
    pub fn unstage(
        &mut self,
        sell: CurrencyId,
        buy: CurrencyId,
        sell_amount: Amount,
        buy_amount: Amount,
    ) -> Result<StagedVolume> {
        let offset = self.writable_offset(sell, buy)?;
        let sell_amount = validate_amount(sell_amount, "unstaged sell volume")?;
        let buy_amount = validate_amount(buy_amount, "unstaged buy volume")?;
        let staged = &mut self.cells[offset].staged;
        let removed = StagedVolume::new(sell_amount.min(staged.sell), buy_amount.min(staged.buy));
        staged.sell -= removed.sell;
        staged.buy -= removed.buy;
        Ok(removed)
    }

    /// Stage both legs of an order on its pair.
    pub fn apply_order(&mut self, order: &Order) -> Result<()> {
        self.stage(
            order.sell_id(),
            order.buy_id(),
            order.sell_amount(),
            order.buy_amount(),
        )
    }

    /// Reset the pair's accumulators, returning what was staged.
    pub fn clear_staged(&mut self, sell: CurrencyId, buy: CurrencyId) -> Result<StagedVolume> {
        let offset = self.offset(sell, buy)?;
        Ok(std::mem::take(&mut self.cells[offset].staged))
    }

    /// Pairs with non-zero staged volume, in row-major order.
    pub fn pending(&self) -> impl Iterator<Item = (CurrencyId, CurrencyId, StagedVolume)> + '_ {
        let n = self.currencies;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.staged.is_zero())
            .map(move |(offset, cell)| {
                (
                    CurrencyId::new(offset / n),
                    CurrencyId::new(offset % n),
                    cell.staged,
                )
            })
    }

    pub fn has_pending(&self) -> bool {
        self.cells.iter().any(|cell| !cell.staged.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> CurrencyId {
        CurrencyId::new(n)
    }

    #[test]
    fn test_matrix_starts_zeroed() {
        let matrix = RateMatrix::new(3).unwrap();
        assert_eq!(matrix.currencies(), 3);
        for sell in 0..3 {
            for buy in 0..3 {
                assert_eq!(*matrix.cell(id(sell), id(buy)).unwrap(), RateCell::default());
            }
        }
        assert!(!matrix.has_pending());
    }

    #[test]
    fn test_rates_are_directional() {
        let mut matrix = RateMatrix::new(2).unwrap();
        matrix.set_rate(id(0), id(1), 5.0).unwrap();
        assert_eq!(matrix.current_rate(id(0), id(1)).unwrap(), 5.0);
        assert_eq!(matrix.current_rate(id(1), id(0)).unwrap(), 0.0);
    }

    #[test]
    fn test_cells_do_not_alias() {
        // Every pair in a 4x4 grid gets its own slot.
        let mut matrix = RateMatrix::new(4).unwrap();
        for sell in 0..4 {
            for buy in 0..4 {
                if sell != buy {
                    matrix
                        .set_rate(id(sell), id(buy), (sell * 10 + buy) as f64)
                        .unwrap();
                }
            }
        }
        for sell in 0..4 {
            for buy in 0..4 {
                if sell != buy {
                    assert_eq!(
                        matrix.current_rate(id(sell), id(buy)).unwrap(),
                        (sell * 10 + buy) as f64
                    );
                }
            }
        }
    }

    #[test]
    fn test_stage_accumulates() {
        let mut matrix = RateMatrix::new(2).unwrap();
        matrix.stage(id(1), id(0), 5.0, 4.0).unwrap();
        matrix.stage(id(1), id(0), 1.0, 2.0).unwrap();
        assert_eq!(matrix.staged(id(1), id(0)).unwrap(), StagedVolume::new(6.0, 6.0));
        assert!(matrix.staged(id(0), id(1)).unwrap().is_zero());
    }

    #[test]
    fn test_unstage_clamps_each_field() {
        let mut matrix = RateMatrix::new(2).unwrap();
        matrix.stage(id(0), id(1), 10.0, 3.0).unwrap();
        let removed = matrix.unstage(id(0), id(1), 4.0, 8.0).unwrap();
        assert_eq!(removed, StagedVolume::new(4.0, 3.0));
        assert_eq!(matrix.staged(id(0), id(1)).unwrap(), StagedVolume::new(6.0, 0.0));
    }

    #[test]
    fn test_apply_order_stages_both_legs() {
        let mut matrix = RateMatrix::new(4).unwrap();
        let order = Order::new(id(3), 10.0, id(2), 20.0).unwrap();
        matrix.apply_order(&order).unwrap();
        assert_eq!(matrix.staged(id(3), id(2)).unwrap(), StagedVolume::new(10.0, 20.0));
    }

    #[test]
    fn test_apply_order_out_of_range() {
        let mut matrix = RateMatrix::new(2).unwrap();
        let order = Order::new(id(3), 10.0, id(0), 20.0).unwrap();
        assert_eq!(
            matrix.apply_order(&order),
            Err(ExchangeError::Index { id: 3, bound: 2 })
        );
        assert!(!matrix.has_pending());
    }

    #[test]
    fn test_self_pair_rejected() {
        let mut matrix = RateMatrix::new(2).unwrap();
        assert!(matrix.set_rate(id(1), id(1), 1.0).is_err());
        assert!(matrix.stage(id(1), id(1), 1.0, 1.0).is_err());
        assert_eq!(matrix.current_rate(id(1), id(1)).unwrap(), 0.0);
    }

    #[test]
    fn test_bounds_checked_before_mutation() {
        let mut matrix = RateMatrix::new(2).unwrap();
        let before = matrix.clone();
        assert!(matrix.set_rate(id(0), id(2), 1.0).is_err());
        assert!(matrix.stage(id(2), id(0), 1.0, 1.0).is_err());
        assert!(matrix.unstage(id(0), id(5), 1.0, 1.0).is_err());
        assert!(matrix.stage(id(0), id(1), -1.0, 1.0).is_err());
        assert_eq!(matrix, before);
    }

    #[test]
    fn test_pending_is_row_major() {
        let mut matrix = RateMatrix::new(3).unwrap();
        matrix.stage(id(2), id(0), 1.0, 1.0).unwrap();
        matrix.stage(id(0), id(2), 2.0, 2.0).unwrap();
        matrix.stage(id(1), id(0), 3.0, 3.0).unwrap();
        let pairs: Vec<_> = matrix
            .pending()
            .map(|(s, b, _)| (s.index(), b.index()))
            .collect();
        assert_eq!(pairs, vec![(0, 2), (1, 0), (2, 0)]);
    }

    #[test]
    fn test_stage_rejects_overflowing_total() {
        let mut matrix = RateMatrix::new(2).unwrap();
        matrix.stage(id(0), id(1), f64::MAX, 1.0).unwrap();
        assert!(matches!(
            matrix.stage(id(0), id(1), f64::MAX, 1.0),
            Err(ExchangeError::InvariantViolation(_))
        ));
        assert!(matrix.stage(id(0), id(1), 1.0, f64::MAX).is_ok());
        assert!(matrix.stage(id(0), id(1), 0.0, f64::MAX).is_err());
        assert_eq!(
            matrix.staged(id(0), id(1)).unwrap(),
            StagedVolume::new(f64::MAX, f64::MAX)
        );
    }

    #[test]
    fn test_clear_staged() {
        let mut matrix = RateMatrix::new(2).unwrap();
        matrix.stage(id(0), id(1), 2.0, 3.0).unwrap();
        let cleared = matrix.clear_staged(id(0), id(1)).unwrap();
        assert_eq!(cleared, StagedVolume::new(2.0, 3.0));
        assert!(!matrix.has_pending());
    }

    #[test]
    fn test_oversized_matrix_fails_to_allocate() {
        assert!(matches!(
            RateMatrix::new(usize::MAX),
            Err(ExchangeError::Allocation { .. })
        ));
    }
}
