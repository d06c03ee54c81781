//! One exchange, one strategy, one turn.
//!
//! Walks through seeding balances and rates, registering a strategy,
//! placing a manual order and running a turn.

use mm7::prelude::*;

fn main() -> Result<()> {
    println!("╔══════════════════════════════════╗");
    println!("║  mm7: Basic Turn Example         ║");
    println!("╚══════════════════════════════════╝\n");

    let usd = CurrencyId::new(0);
    let eur = CurrencyId::new(1);

    let mut exchange = Exchange::new(2)?;
    exchange.set_balance(usd, 100.0)?;
    exchange.set_balance(eur, 100.0)?;
    exchange.set_rate(eur, usd, 0.9)?;
    exchange.set_rate(usd, eur, 1.1)?;

    println!("Opening balances: {:?}", exchange.ledger().balances());
    println!("Rate EUR->USD: {}", exchange.rate(eur, usd)?);

    // Sell 10 EUR for 9 USD whenever EUR->USD is at or below 1.0.
    exchange.add_strategy(eur, usd, Comparator::Le, 1.0, 10.0, 9.0)?;

    // A one-off order, staged until the turn settles.
    let order = Order::new(usd, 5.0, eur, 4.0)?;
    println!("Placing order {} (rate {:.3})", order, order.rate());
    exchange.apply_order(&order)?;
    println!("Staged USD->EUR: {:?}\n", exchange.staged(usd, eur)?);

    let report = exchange.run_turn()?;
    println!("{}", report);

    println!("Closing balances: {:?}", exchange.ledger().balances());
    println!("Turns completed:  {}", exchange.turns());
    println!("Covers 100 USD?   {}", exchange.covers(usd, 100.0)?);

    exchange.teardown();
    Ok(())
}
