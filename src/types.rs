//! Core types used throughout Unibook
//!
//! Defines the asset and side vocabulary shared by the book, the quote
//! calculator and the venue adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported trading assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    BTC,
    ETH,
    SOL,
}

impl Default for Asset {
    fn default() -> Self {
        Asset::BTC
    }
}

impl Asset {
    /// Get the trading pair for Binance (e.g., "BTCUSDT")
    pub fn binance_symbol(&self) -> &'static str {
        match self {
            Asset::BTC => "BTCUSDT",
            Asset::ETH => "ETHUSDT",
            Asset::SOL => "SOLUSDT",
        }
    }

    /// Get the product ID for Coinbase (e.g., "BTC-USD")
    pub fn coinbase_product(&self) -> &'static str {
        match self {
            Asset::BTC => "BTC-USD",
            Asset::ETH => "ETH-USD",
            Asset::SOL => "SOL-USD",
        }
    }

    /// Get the symbol for Gemini (e.g., "btcusd")
    pub fn gemini_symbol(&self) -> &'static str {
        match self {
            Asset::BTC => "btcusd",
            Asset::ETH => "ethusd",
            Asset::SOL => "solusd",
        }
    }

    /// Get the pair for Kraken (e.g., "XBTUSD")
    pub fn kraken_pair(&self) -> &'static str {
        match self {
            Asset::BTC => "XBTUSD",
            Asset::ETH => "ETHUSD",
            Asset::SOL => "SOLUSD",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BTC" => Some(Asset::BTC),
            "ETH" => Some(Asset::ETH),
            "SOL" => Some(Asset::SOL),
            _ => None,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::BTC => write!(f, "BTC"),
            Asset::ETH => write!(f, "ETH"),
            Asset::SOL => write!(f, "SOL"),
        }
    }
}

/// Quote side (buy walks asks, sell walks bids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Default for Side {
    fn default() -> Self {
        Side::Buy
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Order book side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookSide {
    Bid,
    Ask,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookSide::Bid => write!(f, "bid"),
            BookSide::Ask => write!(f, "ask"),
        }
    }
}
