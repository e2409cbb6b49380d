//! Gemini REST order book adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{parse_level, VenueAdapter, VenueError};
use crate::book::OrderBook;
use crate::types::Asset;

const GEMINI_API_URL: &str = "https://api.gemini.com/v1";

/// Gemini reports levels as objects instead of price/size arrays
#[derive(Debug, Deserialize)]
struct GeminiLevel {
    price: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct GeminiBook {
    #[serde(default)]
    bids: Vec<GeminiLevel>,
    #[serde(default)]
    asks: Vec<GeminiLevel>,
}

#[derive(Debug, Clone)]
pub struct GeminiVenue {
    client: Client,
    asset: Asset,
}

impl GeminiVenue {
    pub fn new(client: Client, asset: Asset) -> Self {
        Self { client, asset }
    }

    fn normalize(payload: GeminiBook) -> OrderBook {
        let mut book = OrderBook::new();
        for level in &payload.bids {
            if let Some((price, amount)) = parse_level(&level.price, &level.amount) {
                book.add_bid(price, amount);
            }
        }
        for level in &payload.asks {
            if let Some((price, amount)) = parse_level(&level.price, &level.amount) {
                book.add_ask(price, amount);
            }
        }
        book
    }
}

#[async_trait]
impl VenueAdapter for GeminiVenue {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
        // limit 0 asks Gemini for the full book
        let url = format!(
            "{}/book/{}?limit_bids=0&limit_asks=0",
            GEMINI_API_URL,
            self.asset.gemini_symbol()
        );
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let payload: GeminiBook = serde_json::from_slice(&body)
            .map_err(|e| VenueError::MalformedSnapshot(e.to_string()))?;
        Ok(Self::normalize(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_object_levels() {
        let raw = r#"{
            "bids": [
                {"price": "64000.01", "amount": "0.5", "timestamp": "1700000000"},
                {"price": "63999.50", "amount": "1.2", "timestamp": "1700000000"}
            ],
            "asks": [
                {"price": "64000.02", "amount": "0.8", "timestamp": "1700000000"}
            ]
        }"#;
        let payload: GeminiBook = serde_json::from_str(raw).unwrap();
        let book = GeminiVenue::normalize(payload);

        assert_eq!(book.bid_depth(), 2);
        assert_eq!(book.best_ask(), Some((64000.02, 0.8)));
    }

    #[test]
    fn empty_payload_yields_empty_book() {
        let payload: GeminiBook = serde_json::from_str("{}").unwrap();
        let book = GeminiVenue::normalize(payload);
        assert!(book.is_empty());
    }
}
