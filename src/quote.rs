//! Execution price calculator
//!
//! Walks a consolidated book's price levels best-first to compute the
//! volume-weighted average price for a requested quantity, or reports
//! insufficient liquidity when the book cannot fill it.

use serde::Serialize;
use thiserror::Error;

use crate::book::OrderBook;
use crate::types::Side;

/// Absolute tolerance for fill-quantity comparison. Accumulated floating
/// sums drift, so sufficiency is never checked with exact equality.
pub const QTY_TOLERANCE: f64 = 1e-9;

/// Caller errors on a quote request. Fatal to that single request only,
/// never to the aggregation cycle.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("requested quantity must be positive and finite, got {0}")]
    InvalidQuantity(f64),
}

/// Outcome of a liquidity walk. Insufficient liquidity is a valid result,
/// not an error, and is never encoded as a numeric sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum QuoteOutcome {
    /// The full quantity fills at this volume-weighted average price.
    Filled { vwap: f64 },
    /// The book exhausted before filling; `available` is what it held.
    InsufficientLiquidity { available: f64 },
}

/// A priced execution request against a consolidated book
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ExecutionQuote {
    pub requested: f64,
    pub side: Side,
    pub outcome: QuoteOutcome,
}

/// Compute the volume-weighted execution price for `quantity` against
/// `book`. A buy walks asks ascending, a sell walks bids descending.
pub fn quote(book: &OrderBook, quantity: f64, side: Side) -> Result<ExecutionQuote, QuoteError> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(QuoteError::InvalidQuantity(quantity));
    }

    let (filled, cost) = match side {
        Side::Buy => walk(book.iter_asks(), quantity),
        Side::Sell => walk(book.iter_bids(), quantity),
    };

    let outcome = if (filled - quantity).abs() <= QTY_TOLERANCE {
        QuoteOutcome::Filled {
            vwap: cost / quantity,
        }
    } else {
        QuoteOutcome::InsufficientLiquidity { available: filled }
    };

    Ok(ExecutionQuote {
        requested: quantity,
        side,
        outcome,
    })
}

/// Take `min(available, remaining)` at each level best-first, returning
/// (quantity filled, accumulated cost).
fn walk(levels: impl Iterator<Item = (f64, f64)>, quantity: f64) -> (f64, f64) {
    let mut remaining = quantity;
    let mut filled = 0.0;
    let mut cost = 0.0;

    for (price, available) in levels {
        if remaining <= 0.0 {
            break;
        }
        let taken = available.min(remaining);
        cost += taken * price;
        filled += taken;
        remaining -= taken;
    }

    (filled, cost)
}
