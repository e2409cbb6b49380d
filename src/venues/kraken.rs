//! Kraken REST order book adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use super::{parse_level, VenueAdapter, VenueError};
use crate::book::OrderBook;
use crate::types::Asset;

const KRAKEN_DEPTH_URL: &str = "https://api.kraken.com/0/public/Depth";

/// Kraken wraps depth in a result map keyed by its own pair alias
/// (e.g. requesting XBTUSD answers under XXBTZUSD). We only ever request
/// one pair, so the single entry is the book we asked for.
#[derive(Debug, Deserialize)]
struct KrakenResponse {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: HashMap<String, KrakenDepth>,
}

/// Levels are ["price", "volume", timestamp]; the timestamp is numeric.
#[derive(Debug, Deserialize)]
struct KrakenDepth {
    #[serde(default)]
    bids: Vec<(String, String, serde_json::Value)>,
    #[serde(default)]
    asks: Vec<(String, String, serde_json::Value)>,
}

#[derive(Debug, Clone)]
pub struct KrakenVenue {
    client: Client,
    asset: Asset,
    depth: usize,
}

impl KrakenVenue {
    pub fn new(client: Client, asset: Asset, depth: usize) -> Self {
        Self {
            client,
            asset,
            depth,
        }
    }

    fn normalize(response: KrakenResponse) -> Result<OrderBook, VenueError> {
        if !response.error.is_empty() {
            return Err(VenueError::Rejected(response.error.join("; ")));
        }
        let depth = response
            .result
            .into_values()
            .next()
            .ok_or_else(|| VenueError::MalformedSnapshot("empty result map".to_string()))?;

        let mut book = OrderBook::new();
        for (price, volume, _) in &depth.bids {
            if let Some((price, volume)) = parse_level(price, volume) {
                book.add_bid(price, volume);
            }
        }
        for (price, volume, _) in &depth.asks {
            if let Some((price, volume)) = parse_level(price, volume) {
                book.add_ask(price, volume);
            }
        }
        Ok(book)
    }
}

#[async_trait]
impl VenueAdapter for KrakenVenue {
    fn name(&self) -> &'static str {
        "kraken"
    }

    async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
        let url = format!(
            "{}?pair={}&count={}",
            KRAKEN_DEPTH_URL,
            self.asset.kraken_pair(),
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
        let response: KrakenResponse = serde_json::from_slice(&body)
            .map_err(|e| VenueError::MalformedSnapshot(e.to_string()))?;
        Self::normalize(response)
    }
}
