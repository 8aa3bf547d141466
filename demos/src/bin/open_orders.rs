//! Demo 2: Open Orders and Balances
//!
//! Showcases: signed requests, pagination, per-endpoint rates, error recovery hints
//!
//! Needs CDC_API_KEY and CDC_API_SECRET in the environment.
//!
//! Run: cargo run --bin open_orders [INSTRUMENT]

use cdc_rest::{v2, ClientConfig, Credentials, RestError};
use cdc_types::OrderSide;
use colored::*;
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    println!("{}", "═".repeat(70).cyan());
    println!("{}", "  OPEN ORDERS".cyan().bold());
    println!("{}", "  Crypto.com Exchange v2 private endpoints".cyan());
    println!("{}", "═".repeat(70).cyan());
    println!();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    };
    let instrument = std::env::args().nth(1).unwrap_or_default();

    let config = ClientConfig::new()
        .with_credentials(credentials)
        .with_max_rate_limit_retries(3);
    let client = v2::Client::with_config(config)?;

    match client.accounts().await {
        Ok(accounts) => {
            println!("{}", "Balances".bold());
            for account in accounts.iter().filter(|a| a.balance > Decimal::ZERO) {
                println!(
                    "  {:<8} {:>20} available {:>20}",
                    account.currency,
                    account.balance.normalize(),
                    account.available.normalize()
                );
            }
            println!();
        }
        Err(e) => report(&e),
    }

    match client.open_orders(&instrument).await {
        Ok(orders) if orders.is_empty() => println!("{} no open orders", "✓".green()),
        Ok(orders) => {
            println!("{} ({})", "Open orders".bold(), orders.len());
            for order in orders {
                let side = format!("{:<5}", order.side);
                let side = match order.side() {
                    Some(OrderSide::Buy) => side.as_str().green(),
                    _ => side.as_str().red(),
                };
                println!(
                    "  {:<20} {:<10} {} {:>14} @ {:<14} filled {}",
                    order.order_id,
                    order.instrument_name,
                    side,
                    order.quantity.normalize(),
                    order.price.normalize(),
                    order.cumulative_quantity.normalize()
                );
            }
        }
        Err(e) => report(&e),
    }

    Ok(())
}

fn report(error: &RestError) {
    eprintln!("{} {}", "✗".red(), error);
    let strategy = error.recovery_strategy();
    if strategy.allows_retry() {
        eprintln!("  retryable: {:?}", strategy);
    }
}
