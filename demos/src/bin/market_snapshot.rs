//! Demo 1: Market Snapshot
//!
//! Showcases: public v2 endpoints, request pacing with a wait hook
//!
//! Run: cargo run --bin market_snapshot [INSTRUMENT ...]

use cdc_rest::{v2, ClientConfig, PacerHooks};
use colored::*;
use rust_decimal::Decimal;

const DEFAULT_INSTRUMENTS: [&str; 3] = ["BTC_USDT", "ETH_BTC", "CRO_USDT"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    println!("{}", "═".repeat(70).cyan());
    println!("{}", "  MARKET SNAPSHOT".cyan().bold());
    println!("{}", "  Crypto.com Exchange v2 public endpoints".cyan());
    println!("{}", "═".repeat(70).cyan());
    println!();

    let mut instruments: Vec<String> = std::env::args().skip(1).collect();
    if instruments.is_empty() {
        instruments = DEFAULT_INSTRUMENTS.iter().map(|s| s.to_string()).collect();
    }

    let hooks = PacerHooks::new()
        .on_wait(|info| {
            if info.cooldown {
                println!(
                    "{} rate limited, waiting {:?} before {}",
                    "!".yellow(),
                    info.delay,
                    info.path
                );
            }
            Ok(())
        })
        .on_cooldown(|method, path| {
            println!("{} {} {} was rejected with 429", "✗".red(), method, path);
        });
    let client = v2::Client::with_config(ClientConfig::new().with_pacer_hooks(hooks))?;

    let listed = client.symbols().await?;
    println!("{} {} instruments listed\n", "✓".green(), listed.len());

    println!(
        "{:<12} {:>16} {:>16} {:>16} {:>12}",
        "INSTRUMENT".bold(),
        "LAST".bold(),
        "BID".bold(),
        "ASK".bold(),
        "SPREAD".bold()
    );
    println!("{}", "─".repeat(76));

    for name in &instruments {
        let ticker = match client.ticker(name).await {
            Ok(ticker) => ticker,
            Err(e) => {
                println!("{:<12} {}", name, e.to_string().red());
                continue;
            }
        };
        let book = client.order_book(name).await?;
        let spread = book
            .spread()
            .map(|s| s.normalize().to_string())
            .unwrap_or_else(|| "-".into());

        let change = if ticker.change >= Decimal::ZERO {
            format!("{:>16}", ticker.last.normalize()).green()
        } else {
            format!("{:>16}", ticker.last.normalize()).red()
        };

        println!(
            "{:<12} {} {:>16} {:>16} {:>12}",
            name,
            change,
            ticker.best_bid.normalize(),
            ticker.best_ask.normalize(),
            spread
        );
    }

    println!();
    Ok(())
}
