//! mm7 CLI
//!
//! Run self-checks and exchange scenarios from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Run named checks
//! mm7 check order_init end_to_end_turn
//!
//! # Replay a scenario file
//! mm7 run --input scenario.json
//!
//! # Generate a random scenario
//! mm7 generate --currencies 4 --strategies 12
//! ```

use mm7::checks::{self, CHECKS};
use mm7::simulation::random_market::{generate_random_market, MarketConfig};
use mm7::simulation::scenario::Scenario;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"mm7 — multi-currency exchange model

USAGE:
    mm7 <COMMAND> [OPTIONS]

COMMANDS:
    check <NAME>...   Run named self-checks
    list              List available checks
    run               Replay a scenario file
    generate          Generate a random scenario
    help              Show this message

OPTIONS (run):
    --input <FILE>      Path to JSON scenario file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --currencies <N>    Number of currencies (default: 5)
    --strategies <N>    Number of strategies (default: 20)
    --turns <N>         Turns to run (default: 10)
    --seed <N>          Seed for a reproducible market
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    mm7 check order_init end_to_end_turn
    mm7 run --input scenario.json --format json
    mm7 generate --currencies 3 --seed 7 --output market.json

Set RUST_LOG=debug to trace strategy evaluation."#
    );
}

fn cmd_check(names: &[String]) {
    if names.is_empty() {
        eprintln!("Error: expected tests to be passed as options.");
        process::exit(1);
    }

    let mut failed = 0;
    for name in names {
        match checks::run_check(name) {
            Some(passed) => {
                println!(
                    "TEST {} RESULT {}",
                    name,
                    if passed { "PASS" } else { "FAIL" }
                );
                if !passed {
                    failed += 1;
                }
            }
            None => {
                eprintln!("Invalid Test Name:{}", name);
                process::exit(2);
            }
        }
    }

    if failed > 0 {
        process::exit(3);
    }
}

fn cmd_list() {
    for check in CHECKS {
        println!("{}", check.name);
    }
}

fn cmd_run(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let scenario = Scenario::load(&path).unwrap_or_else(|e| {
        eprintln!("Error loading '{}': {}", path, e);
        process::exit(1);
    });

    let outcome = scenario.run().unwrap_or_else(|e| {
        eprintln!("Error running scenario: {}", e);
        process::exit(1);
    });

    if format == "json" {
        #[derive(serde::Serialize)]
        struct RunOutput<'a> {
            turns: usize,
            balances: &'a [f64],
            reports: &'a [mm7::exchange::report::TurnReport],
        }

        let output = RunOutput {
            turns: outcome.exchange.turns(),
            balances: outcome.balances(),
            reports: &outcome.reports,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error encoding output: {}", e);
                process::exit(1);
            }
        }
    } else {
        for report in &outcome.reports {
            println!("{}", report);
        }
        println!("=== Final Balances ===");
        for (id, amount) in outcome.balances().iter().enumerate() {
            println!("  {}: {}", id, amount);
        }
    }
}

fn parse_number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    args.get(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("{} requires a number", flag);
            process::exit(1);
        })
}

fn cmd_generate(args: &[String]) {
    let mut config = MarketConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--currencies" => {
                i += 1;
                config.currencies = parse_number(args, i, "--currencies");
            }
            "--strategies" => {
                i += 1;
                config.strategies = parse_number(args, i, "--strategies");
            }
            "--turns" => {
                i += 1;
                config.turns = parse_number(args, i, "--turns");
            }
            "--seed" => {
                i += 1;
                config.seed = Some(parse_number(args, i, "--seed"));
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    if config.currencies == 0 {
        eprintln!("--currencies must be at least 1");
        process::exit(1);
    }

    let scenario = generate_random_market(&config);
    let json = scenario.to_json().unwrap_or_else(|e| {
        eprintln!("Error encoding scenario: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} currencies and {} strategies → {}",
            scenario.currencies,
            scenario.strategies.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "check" => cmd_check(rest),
        "list" => cmd_list(),
        "run" => cmd_run(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
