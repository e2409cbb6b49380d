//! Unibook binary: one aggregation cycle plus buy/sell quotes
//!
//! Usage: unibook [QUANTITY]
//!
//! Fetches a snapshot from every enabled venue, merges them into one
//! consolidated book and prints the volume-weighted price to buy and to
//! sell the requested quantity (config default when omitted).

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use unibook::aggregate;
use unibook::config::AppConfig;
use unibook::quote::quote;
use unibook::report;
use unibook::types::Side;
use unibook::venues;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = AppConfig::load().context("failed to load configuration")?;
    let asset = cfg.asset()?;
    info!(config = %cfg.digest(), "starting aggregation cycle");

    let quantity = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("invalid quantity argument: {raw}"))?,
        None => cfg.quote.default_quantity,
    };

    let client = venues::http_client(Duration::from_millis(cfg.fetch.timeout_ms));
    let adapters = venues::enabled(&cfg, asset, &client);
    if adapters.is_empty() {
        bail!("no venues enabled; check the [venues] config section");
    }

    let aggregation = aggregate::aggregate(&adapters, &cfg.fetch_options()).await;
    for failure in &aggregation.failures {
        warn!(venue = %failure.venue, error = %failure.error, "venue excluded from merge");
    }

    println!("Merged order book ({asset}):");
    print!("{}", report::book_summary(&aggregation.book, cfg.quote.report_levels));

    let buy = quote(&aggregation.book, quantity, Side::Buy)?;
    let sell = quote(&aggregation.book, quantity, Side::Sell)?;
    println!("{}", report::quote_line(&buy, asset));
    println!("{}", report::quote_line(&sell, asset));

    Ok(())
}
