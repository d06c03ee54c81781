use crate::core::currency::{Amount, CurrencyId};
use crate::core::error::{ExchangeError, Result};
use crate::core::ledger::BalanceLedger;
use crate::market::rate_matrix::{RateMatrix, StagedVolume};
use serde::{Deserialize, Serialize};

/// What happened to one pair's staged volume during settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub sell: CurrencyId,
    pub buy: CurrencyId,
    /// Volume that was staged on the pair when settlement began.
    pub staged: StagedVolume,
    /// Amount actually taken from the sell-side balance.
    pub withdrawn: Amount,
    /// Amount credited to the buy-side balance.
    pub deposited: Amount,
}

impl SettlementRecord {
    /// Staged sell volume the ledger could not cover.
    pub fn shortfall(&self) -> Amount {
        self.staged.sell - self.withdrawn
    }

    pub fn is_clamped(&self) -> bool {
        self.shortfall() > 0.0
    }
}

/// Move all staged volume into the ledger and clear the accumulators.
///
/// Pairs are settled in row-major order. For each pair the staged sell
/// volume is withdrawn from the sell currency (clamped at the available
/// balance) and the staged buy volume is deposited into the buy currency.
pub fn settle(matrix: &mut RateMatrix, ledger: &mut BalanceLedger) -> Result<Vec<SettlementRecord>> {
    if matrix.currencies() != ledger.len() {
        return Err(ExchangeError::invariant(format!(
            "rate matrix covers {} currencies but ledger covers {}",
            matrix.currencies(),
            ledger.len()
        )));
    }

    let pending: Vec<(CurrencyId, CurrencyId, StagedVolume)> = matrix.pending().collect();
    let mut records = Vec::with_capacity(pending.len());

    for (sell, buy, staged) in pending {
        let withdrawn = ledger.withdraw(sell, staged.sell)?;
        ledger.deposit(buy, staged.buy)?;
        matrix.clear_staged(sell, buy)?;

        let record = SettlementRecord {
            sell,
            buy,
            staged,
            withdrawn,
            deposited: staged.buy,
        };
        if record.is_clamped() {
            log::warn!(
                "settlement {}->{}: only {} of {} available in currency {}",
                sell,
                buy,
                withdrawn,
                staged.sell,
                sell
            );
        }
        records.push(record);
    }

    Ok(records)
}
