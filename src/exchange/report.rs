use crate::core::currency::{Amount, CurrencyId};
use crate::exchange::settlement::SettlementRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of evaluating one strategy during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyMatch {
    /// Position of the strategy in the registry.
    pub index: usize,
    pub sell: CurrencyId,
    pub buy: CurrencyId,
    /// Live rate the strategy was evaluated against.
    pub rate: f64,
    pub matched: bool,
}

/// Summary of one completed turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// 1-based number of this turn.
    pub turn: usize,
    /// One entry per registered strategy, in registry order.
    pub matches: Vec<StrategyMatch>,
    /// One entry per pair that had staged volume, in row-major order.
    pub settlements: Vec<SettlementRecord>,
    pub completed_at: DateTime<Utc>,
}

impl TurnReport {
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.matched).count()
    }

    /// Total staged sell volume that could not be withdrawn this turn.
    pub fn shortfall(&self) -> Amount {
        self.settlements.iter().map(|s| s.shortfall()).sum()
    }
}

impl std::fmt::Display for TurnReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Turn {} ===", self.turn)?;
        writeln!(
            f,
            "Strategies matched: {}/{}",
            self.matched_count(),
            self.matches.len()
        )?;
        for m in self.matches.iter().filter(|m| m.matched) {
            writeln!(f, "  #{} {}->{} @ {}", m.index, m.sell, m.buy, m.rate)?;
        }
        writeln!(f, "Settled pairs: {}", self.settlements.len())?;
        for s in &self.settlements {
            write!(
                f,
                "  {}->{}: -{} / +{}",
                s.sell, s.buy, s.withdrawn, s.deposited
            )?;
            if s.is_clamped() {
                write!(f, " (short {})", s.shortfall())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::rate_matrix::StagedVolume;

    fn sample_report() -> TurnReport {
        TurnReport {
            turn: 3,
            matches: vec![
                StrategyMatch {
                    index: 0,
                    sell: CurrencyId::new(1),
                    buy: CurrencyId::new(0),
                    rate: 0.9,
                    matched: true,
                },
                StrategyMatch {
                    index: 1,
                    sell: CurrencyId::new(0),
                    buy: CurrencyId::new(1),
                    rate: 1.2,
                    matched: false,
                },
            ],
            settlements: vec![SettlementRecord {
                sell: CurrencyId::new(1),
                buy: CurrencyId::new(0),
                staged: StagedVolume::new(10.0, 9.0),
                withdrawn: 7.0,
                deposited: 9.0,
            }],
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_counts() {
        let report = sample_report();
        assert_eq!(report.matched_count(), 1);
        assert_eq!(report.shortfall(), 3.0);
    }

    #[test]
    fn test_report_display() {
        let text = sample_report().to_string();
        assert!(text.contains("=== Turn 3 ==="));
        assert!(text.contains("Strategies matched: 1/2"));
        assert!(text.contains("1->0: -7 / +9 (short 3)"));
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["turn"], 3);
        assert_eq!(json["matches"][0]["matched"], true);
        assert_eq!(json["settlements"][0]["staged"]["sell"], 10.0);
    }
}
