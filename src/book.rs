//! Price-level ledger
//!
//! Holds aggregated bid/ask quantity per price in venue-agnostic units.
//! Prices are keyed by integer ticks so that numerically-equal prices from
//! different venues always land on the same level, regardless of binary
//! rounding in the upstream floats.

use std::collections::BTreeMap;

use crate::quote::{self, ExecutionQuote, QuoteError};
use crate::types::{BookSide, Side};

/// Tick size used for price keys. 1e-8 covers every venue tick size we
/// consume while staying well inside i64 range for any real price.
const TICK_SCALE: f64 = 1e8;

/// Convert a float price to its tick key, collapsing binary noise.
pub(crate) fn price_to_ticks(price: f64) -> i64 {
    (price * TICK_SCALE).round() as i64
}

pub(crate) fn ticks_to_price(ticks: i64) -> f64 {
    ticks as f64 / TICK_SCALE
}

/// Aggregated order book: quantity per price level, one entry per side.
///
/// Inserting at an existing price accumulates quantity, never replaces it.
/// Levels with non-positive quantity are pruned on insert so depth counts
/// always reflect live liquidity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    bids: BTreeMap<i64, f64>,
    asks: BTreeMap<i64, f64>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate quantity onto the bid level at `price`.
    pub fn add_bid(&mut self, price: f64, quantity: f64) {
        Self::accumulate(&mut self.bids, price, quantity);
    }

    /// Accumulate quantity onto the ask level at `price`.
    pub fn add_ask(&mut self, price: f64, quantity: f64) {
        Self::accumulate(&mut self.asks, price, quantity);
    }

    fn accumulate(side: &mut BTreeMap<i64, f64>, price: f64, quantity: f64) {
        if !price.is_finite() || !quantity.is_finite() || price <= 0.0 || quantity <= 0.0 {
            return;
        }
        *side.entry(price_to_ticks(price)).or_insert(0.0) += quantity;
    }

    /// Number of distinct bid levels
    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    /// Number of distinct ask levels
    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Bid levels from best (highest) price outward
    pub fn iter_bids(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bids.iter().rev().map(|(t, q)| (ticks_to_price(*t), *q))
    }

    /// Ask levels from best (lowest) price outward
    pub fn iter_asks(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.asks.iter().map(|(t, q)| (ticks_to_price(*t), *q))
    }

    /// Best bid as (price, quantity)
    pub fn best_bid(&self) -> Option<(f64, f64)> {
        self.iter_bids().next()
    }

    /// Best ask as (price, quantity)
    pub fn best_ask(&self) -> Option<(f64, f64)> {
        self.iter_asks().next()
    }

    /// Sum of quantity over the best `levels` price levels of one side,
    /// walking from the best price outward. `None` sums the whole side.
    pub fn total_liquidity(&self, side: BookSide, levels: Option<usize>) -> f64 {
        let take = levels.unwrap_or(usize::MAX);
        match side {
            BookSide::Bid => self.iter_bids().take(take).map(|(_, q)| q).sum(),
            BookSide::Ask => self.iter_asks().take(take).map(|(_, q)| q).sum(),
        }
    }

    /// Best ask price minus best bid price.
    ///
    /// Returns 0.0 when either side is empty. That is a documented
    /// degenerate case, not an error.
    pub fn spread(&self) -> f64 {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => ask - bid,
            _ => 0.0,
        }
    }

    /// Volume-weighted price to fill `quantity` against this book, buying
    /// against asks or selling against bids. Delegates to the shared
    /// liquidity walk in [`crate::quote`].
    pub fn best_execution_price(
        &self,
        quantity: f64,
        side: Side,
    ) -> Result<ExecutionQuote, QuoteError> {
        quote::quote(self, quantity, side)
    }
}
