//! Venue adapter implementations (Binance, Coinbase, Gemini, Kraken)
//!
//! Each adapter owns its venue's wire format and field mapping and returns
//! a normalized [`OrderBook`] in comparable units. The core performs no
//! unit reconciliation of its own.

mod binance;
mod coinbase;
mod gemini;
mod kraken;

pub use binance::BinanceVenue;
pub use coinbase::CoinbaseVenue;
pub use gemini::GeminiVenue;
pub use kraken::KrakenVenue;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::book::OrderBook;
use crate::config::AppConfig;
use crate::types::Asset;

/// Per-venue fetch failure. Always recoverable at the aggregation level:
/// a failed venue is excluded from the merge, never aborts the cycle.
#[derive(Debug, Error)]
pub enum VenueError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("venue rejected request: {0}")]
    Rejected(String),
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("no snapshot within {0}ms")]
    Timeout(u64),
}

/// Trait for venue order book sources.
///
/// One fetch is atomic: it yields a full normalized snapshot or fails as a
/// whole. Implementations carry no shared state, so any number of adapters
/// can be registered without touching the core.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    /// Venue identity, used to tag outcomes and failures
    fn name(&self) -> &'static str;

    /// Fetch one normalized order book snapshot
    async fn fetch_book(&self) -> Result<OrderBook, VenueError>;
}

/// Build the shared HTTP client used by every REST adapter
pub fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to build HTTP client")
}

/// Instantiate the adapters enabled in config, in a stable order
pub fn enabled(cfg: &AppConfig, asset: Asset, client: &Client) -> Vec<Box<dyn VenueAdapter>> {
    let mut adapters: Vec<Box<dyn VenueAdapter>> = Vec::new();
    if cfg.venues.binance_enabled {
        adapters.push(Box::new(BinanceVenue::new(
            client.clone(),
            asset,
            cfg.fetch.depth,
        )));
    }
    if cfg.venues.coinbase_enabled {
        adapters.push(Box::new(CoinbaseVenue::new(client.clone(), asset)));
    }
    if cfg.venues.gemini_enabled {
        adapters.push(Box::new(GeminiVenue::new(client.clone(), asset)));
    }
    if cfg.venues.kraken_enabled {
        adapters.push(Box::new(KrakenVenue::new(
            client.clone(),
            asset,
            cfg.fetch.depth,
        )));
    }
    adapters
}

/// Parse one wire price level, dropping anything non-finite or non-positive
pub(crate) fn parse_level(price: &str, quantity: &str) -> Option<(f64, f64)> {
    let price = price.parse::<f64>().ok()?;
    let quantity = quantity.parse::<f64>().ok()?;
    if !price.is_finite() || !quantity.is_finite() || price <= 0.0 || quantity <= 0.0 {
        return None;
    }
    Some((price, quantity))
}
