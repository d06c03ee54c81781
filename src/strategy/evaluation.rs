use crate::core::error::Result;
use crate::market::rate_matrix::RateMatrix;
use crate::strategy::rule::Strategy;

/// Run one strategy against the matrix.
///
/// Reads the live rate of the strategy's pair and, if the comparator is
/// satisfied, stages the strategy's volumes on that pair. Balances are not
/// touched. Both ids are bounds-checked before any cell is read, so an
/// out-of-range strategy fails with an index error and stages nothing.
///
/// Returns whether the strategy matched.
pub fn evaluate(matrix: &mut RateMatrix, strategy: &Strategy) -> Result<bool> {
    let rate = matrix.current_rate(strategy.sell_id(), strategy.buy_id())?;
    let matched = strategy.is_triggered_by(rate);
    log::debug!("strategy [{}] at rate {}: matched={}", strategy, rate, matched);
    if matched {
        matrix.stage(
            strategy.sell_id(),
            strategy.buy_id(),
            strategy.sell_volume(),
            strategy.buy_volume(),
        )?;
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyId;
    use crate::core::error::ExchangeError;
    use crate::market::rate_matrix::StagedVolume;
    use crate::strategy::rule::Comparator;

    fn id(n: usize) -> CurrencyId {
        CurrencyId::new(n)
    }

    fn matrix_with_rate(rate: f64) -> RateMatrix {
        let mut matrix = RateMatrix::new(2).unwrap();
        matrix.set_rate(id(1), id(0), rate).unwrap();
        matrix
    }

    #[test]
    fn test_le_strategy_matches_below_target() {
        let rule = Strategy::new(id(1), id(0), Comparator::Le, 1.0, 5.0, 5.0).unwrap();
        let mut matrix = matrix_with_rate(0.9);
        assert!(evaluate(&mut matrix, &rule).unwrap());
        assert_eq!(matrix.staged(id(1), id(0)).unwrap(), StagedVolume::new(5.0, 5.0));
    }

    #[test]
    fn test_le_strategy_ignores_above_target() {
        let rule = Strategy::new(id(1), id(0), Comparator::Le, 1.0, 5.0, 5.0).unwrap();
        let mut matrix = matrix_with_rate(1.1);
        assert!(!evaluate(&mut matrix, &rule).unwrap());
        assert!(matrix.staged(id(1), id(0)).unwrap().is_zero());
    }

    #[test]
    fn test_ge_strategy() {
        let rule = Strategy::new(id(1), id(0), Comparator::Ge, 1.0, 5.0, 5.0).unwrap();

        let mut matrix = matrix_with_rate(1.1);
        assert!(evaluate(&mut matrix, &rule).unwrap());
        assert_eq!(matrix.staged(id(1), id(0)).unwrap(), StagedVolume::new(5.0, 5.0));

        let mut matrix = matrix_with_rate(0.9);
        assert!(!evaluate(&mut matrix, &rule).unwrap());
        assert!(matrix.staged(id(1), id(0)).unwrap().is_zero());
    }

    #[test]
    fn test_only_target_cell_is_staged() {
        let rule = Strategy::new(id(1), id(0), Comparator::Le, 1.0, 5.0, 5.0).unwrap();
        let mut matrix = matrix_with_rate(0.5);
        evaluate(&mut matrix, &rule).unwrap();
        let pending: Vec<_> = matrix.pending().collect();
        assert_eq!(pending, vec![(id(1), id(0), StagedVolume::new(5.0, 5.0))]);
    }

    #[test]
    fn test_out_of_range_strategy_is_an_index_error() {
        let rule = Strategy::new(id(4), id(0), Comparator::Le, 1.0, 5.0, 5.0).unwrap();
        let mut matrix = matrix_with_rate(0.5);
        let before = matrix.clone();
        assert_eq!(
            evaluate(&mut matrix, &rule),
            Err(ExchangeError::Index { id: 4, bound: 2 })
        );
        assert_eq!(matrix, before);
    }
}
