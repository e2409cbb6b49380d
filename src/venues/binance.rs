//! Binance REST order book adapter
//!
//! Fetches a depth snapshot from the public spot API and normalizes it.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{parse_level, VenueAdapter, VenueError};
use crate::book::OrderBook;
use crate::types::Asset;

const BINANCE_DEPTH_URL: &str = "https://api.binance.com/api/v3/depth";

/// Depth snapshot payload: levels arrive as ["price", "qty"] string pairs
#[derive(Debug, Deserialize)]
struct BinanceDepth {
    #[serde(default)]
    bids: Vec<(String, String)>,
    #[serde(default)]
    asks: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct BinanceVenue {
    client: Client,
    asset: Asset,
    depth: usize,
}

impl BinanceVenue {
    pub fn new(client: Client, asset: Asset, depth: usize) -> Self {
        Self {
            client,
            asset,
            depth,
        }
    }

    fn normalize(depth: BinanceDepth) -> OrderBook {
        let mut book = OrderBook::new();
        for (price, qty) in &depth.bids {
            if let Some((price, qty)) = parse_level(price, qty) {
                book.add_bid(price, qty);
            }
        }
        for (price, qty) in &depth.asks {
            if let Some((price, qty)) = parse_level(price, qty) {
                book.add_ask(price, qty);
            }
        }
        book
    }
}

#[async_trait]
impl VenueAdapter for BinanceVenue {
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
        let url = format!(
            "{}?symbol={}&limit={}",
            BINANCE_DEPTH_URL,
            self.asset.binance_symbol(),
            self.depth
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let depth: BinanceDepth = serde_json::from_slice(&body)
            .map_err(|e| VenueError::MalformedSnapshot(e.to_string()))?;
        Ok(Self::normalize(depth))
    }
}
