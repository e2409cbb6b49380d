//! Console report rendering for the consolidated book and quotes

use std::fmt::Write as _;

use crate::book::OrderBook;
use crate::quote::{ExecutionQuote, QuoteOutcome};
use crate::types::{Asset, BookSide};

/// Render the consolidated book: top levels per side, depth, liquidity
/// and spread.
pub fn book_summary(book: &OrderBook, levels: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Bids (top {levels}):");
    for (price, qty) in book.iter_bids().take(levels) {
        let _ = writeln!(out, "  {price:.6}: {qty:.6}");
    }
    let _ = writeln!(out, "Asks (top {levels}):");
    for (price, qty) in book.iter_asks().take(levels) {
        let _ = writeln!(out, "  {price:.6}: {qty:.6}");
    }

    let _ = writeln!(out, "Bid depth: {}", book.bid_depth());
    let _ = writeln!(out, "Ask depth: {}", book.ask_depth());
    let _ = writeln!(
        out,
        "Total bid liquidity: {:.6}",
        book.total_liquidity(BookSide::Bid, None)
    );
    let _ = writeln!(
        out,
        "Total ask liquidity: {:.6}",
        book.total_liquidity(BookSide::Ask, None)
    );
    let _ = writeln!(out, "Spread: {:.6}", book.spread());

    out
}

/// One line per quote, e.g. "Price to buy 10 BTC: 64210.533333"
pub fn quote_line(quote: &ExecutionQuote, asset: Asset) -> String {
    match quote.outcome {
        QuoteOutcome::Filled { vwap } => format!(
            "Price to {} {} {}: {:.6}",
            quote.side, quote.requested, asset, vwap
        ),
        QuoteOutcome::InsufficientLiquidity { available } => format!(
            "Price to {} {} {}: insufficient liquidity ({available:.6} available)",
            quote.side, quote.requested, asset
        ),
    }
}
