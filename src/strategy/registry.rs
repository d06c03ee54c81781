use crate::core::currency::{Amount, CurrencyId};
use crate::core::error::{ExchangeError, Result};
use crate::strategy::rule::{Comparator, Strategy};

/// Capacity used by [`StrategyRegistry::new`].
pub const DEFAULT_CAPACITY: usize = 10;

/// Append-only, insertion-ordered collection of strategies.
///
/// Capacity doubles whenever a push finds the registry full. Growth keeps
/// every existing entry in place and in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
    capacity: usize,
}

impl StrategyRegistry {
    /// Registry with [`DEFAULT_CAPACITY`] slots reserved.
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut registry = Self::default();
        registry.reserve_to(capacity)?;
        Ok(registry)
    }

    fn reserve_to(&mut self, capacity: usize) -> Result<()> {
        let additional = capacity - self.strategies.len();
        self.strategies
            .try_reserve_exact(additional)
            .map_err(|_| ExchangeError::Allocation {
                what: "strategy registry",
                requested: capacity,
            })?;
        self.capacity = capacity;
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        let target = self
            .capacity
            .max(1)
            .checked_mul(2)
            .ok_or(ExchangeError::Allocation {
                what: "strategy registry",
                requested: usize::MAX,
            })?;
        log::debug!(
            "growing strategy registry from {} to {} slots",
            self.capacity,
            target
        );
        self.reserve_to(target)
    }

    /// Build and append a strategy, returning its position.
    pub fn push(
        &mut self,
        sell_id: CurrencyId,
        buy_id: CurrencyId,
        comparator: Comparator,
        target_rate: f64,
        sell_volume: Amount,
        buy_volume: Amount,
    ) -> Result<usize> {
        let strategy = Strategy::new(
            sell_id,
            buy_id,
            comparator,
            target_rate,
            sell_volume,
            buy_volume,
        )?;
        self.push_strategy(strategy)
    }

    /// Append an already-built strategy, returning its position.
    pub fn push_strategy(&mut self, strategy: Strategy) -> Result<usize> {
        if self.strategies.len() == self.capacity {
            self.grow()?;
        }
        self.strategies.push(strategy);
        Ok(self.strategies.len() - 1)
    }

    /// Slots available before the next growth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Strategy> {
        self.strategies.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Strategy> {
        self.strategies.iter()
    }

    pub fn as_slice(&self) -> &[Strategy] {
        &self.strategies
    }
}

impl<'a> IntoIterator for &'a StrategyRegistry {
    type Item = &'a Strategy;
    type IntoIter = std::slice::Iter<'a, Strategy>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_numbered(registry: &mut StrategyRegistry, n: usize) {
        for i in 0..n {
            registry
                .push(
                    CurrencyId::new(0),
                    CurrencyId::new(1),
                    Comparator::Le,
                    i as f64,
                    1.0,
                    2.0,
                )
                .unwrap();
        }
    }

    #[test]
    fn test_registry_default_capacity() {
        let registry = StrategyRegistry::new().unwrap();
        assert_eq!(registry.capacity(), DEFAULT_CAPACITY);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_push_returns_index() {
        let mut registry = StrategyRegistry::with_capacity(2).unwrap();
        let idx = registry
            .push(CurrencyId::new(1), CurrencyId::new(0), Comparator::Ge, 1.0, 3.0, 3.0)
            .unwrap();
        assert_eq!(idx, 0);
        assert_eq!(registry.get(0).unwrap().comparator(), Comparator::Ge);
        assert!(registry.get(1).is_none());
    }

    #[test]
    fn test_registry_doubles_when_full() {
        let mut registry = StrategyRegistry::with_capacity(2).unwrap();
        push_numbered(&mut registry, 2);
        assert_eq!(registry.capacity(), 2);
        push_numbered(&mut registry, 1);
        assert_eq!(registry.capacity(), 4);
        push_numbered(&mut registry, 2);
        assert_eq!(registry.capacity(), 8);
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_registry_growth_preserves_order() {
        let mut registry = StrategyRegistry::with_capacity(3).unwrap();
        push_numbered(&mut registry, 25);
        let targets: Vec<f64> = registry.iter().map(|s| s.target_rate()).collect();
        let expected: Vec<f64> = (0..25).map(|i| i as f64).collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_registry_zero_capacity_still_grows() {
        let mut registry = StrategyRegistry::with_capacity(0).unwrap();
        push_numbered(&mut registry, 3);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.capacity(), 4);
    }

    #[test]
    fn test_registry_rejects_invalid_strategy() {
        let mut registry = StrategyRegistry::new().unwrap();
        let result = registry.push(
            CurrencyId::new(0),
            CurrencyId::new(0),
            Comparator::Le,
            1.0,
            1.0,
            1.0,
        );
        assert!(matches!(result, Err(ExchangeError::InvariantViolation(_))));
        assert!(registry.is_empty());
    }
}
