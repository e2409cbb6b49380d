//! Coinbase Exchange REST order book adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{parse_level, VenueAdapter, VenueError};
use crate::book::OrderBook;
use crate::types::Asset;

const COINBASE_API_URL: &str = "https://api.exchange.coinbase.com";

/// Level-2 book payload. Each level is ["price", "size", num_orders]; the
/// trailing order count is an integer we never read.
#[derive(Debug, Deserialize)]
struct CoinbaseBook {
    #[serde(default)]
    bids: Vec<(String, String, serde_json::Value)>,
    #[serde(default)]
    asks: Vec<(String, String, serde_json::Value)>,
}

#[derive(Debug, Clone)]
pub struct CoinbaseVenue {
    client: Client,
    asset: Asset,
}

impl CoinbaseVenue {
    pub fn new(client: Client, asset: Asset) -> Self {
        Self { client, asset }
    }

    fn normalize(payload: CoinbaseBook) -> OrderBook {
        let mut book = OrderBook::new();
        for (price, size, _) in &payload.bids {
            if let Some((price, size)) = parse_level(price, size) {
                book.add_bid(price, size);
            }
        }
        for (price, size, _) in &payload.asks {
            if let Some((price, size)) = parse_level(price, size) {
                book.add_ask(price, size);
            }
        }
        book
    }
}

#[async_trait]
impl VenueAdapter for CoinbaseVenue {
    fn name(&self) -> &'static str {
        "coinbase"
    }

    async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
        let url = format!(
            "{}/products/{}/book?level=2",
            COINBASE_API_URL,
            self.asset.coinbase_product()
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let payload: CoinbaseBook = serde_json::from_slice(&body)
            .map_err(|e| VenueError::MalformedSnapshot(e.to_string()))?;
        Ok(Self::normalize(payload))
    }
}
