//! A ladder of strategies on one pair while the rate drifts.
//!
//! Several strategies at different targets share the same pair, so the
//! number that fire (and the volume staged) grows as the rate falls. The
//! sell currency eventually runs dry and settlement clamps.

use mm7::prelude::*;

fn main() -> Result<()> {
    println!("╔══════════════════════════════════╗");
    println!("║  mm7: Strategy Ladder Example    ║");
    println!("╚══════════════════════════════════╝\n");

    let gbp = CurrencyId::new(0);
    let jpy = CurrencyId::new(1);

    let mut exchange = Exchange::new(2)?;
    exchange.set_balance(gbp, 150.0)?;

    for step in 0..5 {
        let target = 190.0 - 2.5 * step as f64;
        exchange.add_strategy(gbp, jpy, Comparator::Le, target, 10.0, 10.0 * target)?;
    }

    let path = [191.0, 189.0, 186.5, 184.0, 180.0, 180.0];
    for rate in path {
        exchange.set_rate(gbp, jpy, rate)?;
        let report = exchange.run_turn()?;
        println!(
            "turn {} @ {:>6.1}: {} rungs fired, GBP {:>6.1}, JPY {:>9.1}, short {:.1}",
            report.turn,
            rate,
            report.matched_count(),
            exchange.balance(gbp)?,
            exchange.balance(jpy)?,
            report.shortfall()
        );
    }

    Ok(())
}
