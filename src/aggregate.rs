//! Aggregation cycle: concurrent venue fetch plus cross-venue merge
//!
//! Queries every configured venue adapter concurrently, isolates per-venue
//! failures, and folds the successful snapshots into one consolidated book.
//! The orchestrator, the merger and the calculator are stateless over
//! explicit inputs, so cycles for different assets can run side by side.

use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::book::OrderBook;
use crate::venues::{VenueAdapter, VenueError};

/// Fan-out bounds for one fetch cycle
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-venue deadline; an elapsed fetch surfaces as `VenueError::Timeout`
    pub timeout: Duration,
    /// Maximum venues fetched at once
    pub max_concurrent: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_concurrent: 8,
        }
    }
}

/// Result of one venue's fetch: the whole snapshot or a tagged error
#[derive(Debug)]
pub struct FetchOutcome {
    pub venue: &'static str,
    pub latency_ms: u64,
    pub result: Result<OrderBook, VenueError>,
}

/// A venue excluded from the merge, and why
#[derive(Debug)]
pub struct VenueFailure {
    pub venue: &'static str,
    pub error: VenueError,
}

/// Consolidated view of one aggregation cycle
#[derive(Debug)]
pub struct Aggregation {
    pub book: OrderBook,
    pub merged_venues: Vec<&'static str>,
    pub failures: Vec<VenueFailure>,
    pub completed_at: DateTime<Utc>,
}

/// Fetch every adapter's snapshot concurrently, bounded by
/// `opts.max_concurrent`, and return exactly one outcome per adapter.
///
/// Each fetch is wrapped in its own timeout; any failure is caught and
/// tagged with the venue name instead of aborting sibling fetches. Returns
/// only once every fetch has completed. Outcome order follows completion
/// order.
pub async fn fetch_all(adapters: &[Box<dyn VenueAdapter>], opts: &FetchOptions) -> Vec<FetchOutcome> {
    stream::iter(adapters)
        .map(|adapter| async move {
            let started = Instant::now();
            let result = match tokio::time::timeout(opts.timeout, adapter.fetch_book()).await {
                Ok(result) => result,
                Err(_) => Err(VenueError::Timeout(opts.timeout.as_millis() as u64)),
            };
            let latency_ms = started.elapsed().as_millis() as u64;
            match &result {
                Ok(book) => debug!(
                    venue = %adapter.name(),
                    latency_ms,
                    bid_depth = book.bid_depth(),
                    ask_depth = book.ask_depth(),
                    "venue snapshot fetched"
                ),
                Err(e) => warn!(venue = %adapter.name(), latency_ms, error = %e, "venue fetch failed"),
            }
            FetchOutcome {
                venue: adapter.name(),
                latency_ms,
                result,
            }
        })
        .buffer_unordered(opts.max_concurrent.max(1))
        .collect()
        .await
}

/// Fold per-venue books into one consolidated book by price-level
/// summation. Numerically equal prices aggregate onto one level; the merge
/// is not venue-identity-aware.
pub fn merge<I: IntoIterator<Item = OrderBook>>(books: I) -> OrderBook {
    let mut merged = OrderBook::new();
    for book in books {
        for (price, qty) in book.iter_bids() {
            merged.add_bid(price, qty);
        }
        for (price, qty) in book.iter_asks() {
            merged.add_ask(price, qty);
        }
    }
    merged
}

/// Run one full aggregation cycle: fetch all venues, merge the successes,
/// report the failures. Zero successful venues is not an error here; the
/// merged book is then simply empty.
pub async fn aggregate(adapters: &[Box<dyn VenueAdapter>], opts: &FetchOptions) -> Aggregation {
    let outcomes = fetch_all(adapters, opts).await;

    let mut books = Vec::new();
    let mut merged_venues = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(book) => {
                merged_venues.push(outcome.venue);
                books.push(book);
            }
            Err(error) => failures.push(VenueFailure {
                venue: outcome.venue,
                error,
            }),
        }
    }

    let book = merge(books);
    info!(
        merged = merged_venues.len(),
        failed = failures.len(),
        bid_depth = book.bid_depth(),
        ask_depth = book.ask_depth(),
        "aggregation cycle complete"
    );

    Aggregation {
        book,
        merged_venues,
        failures,
        completed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venues::MockVenueAdapter;
    use async_trait::async_trait;

    fn book(bids: &[(f64, f64)], asks: &[(f64, f64)]) -> OrderBook {
        let mut book = OrderBook::new();
        for &(p, q) in bids {
            book.add_bid(p, q);
        }
        for &(p, q) in asks {
            book.add_ask(p, q);
        }
        book
    }

    fn ok_adapter(name: &'static str, snapshot: OrderBook) -> Box<dyn VenueAdapter> {
        let mut mock = MockVenueAdapter::new();
        mock.expect_name().return_const(name);
        mock.expect_fetch_book()
            .returning(move || Ok(snapshot.clone()));
        Box::new(mock)
    }

    fn failing_adapter(name: &'static str) -> Box<dyn VenueAdapter> {
        let mut mock = MockVenueAdapter::new();
        mock.expect_name().return_const(name);
        mock.expect_fetch_book()
            .returning(|| Err(VenueError::Rejected("boom".to_string())));
        Box::new(mock)
    }

    #[test]
    fn merge_sums_levels_across_books() {
        let a = book(&[(100.0, 1.0)], &[(101.0, 2.0)]);
        let b = book(&[(100.0, 3.0), (99.0, 1.0)], &[(102.0, 1.0)]);

        let merged = merge([a, b]);
        assert_eq!(merged.bid_depth(), 2);
        assert_eq!(merged.ask_depth(), 2);
        assert_eq!(merged.best_bid(), Some((100.0, 4.0)));
    }

    #[test]
    fn merge_is_commutative() {
        let a = book(&[(100.0, 1.5), (99.5, 2.0)], &[(101.0, 0.7)]);
        let b = book(&[(100.0, 0.5)], &[(101.0, 1.3), (103.0, 4.0)]);

        assert_eq!(merge([a.clone(), b.clone()]), merge([b, a]));
    }

    #[test]
    fn merge_is_associative() {
        let a = book(&[(100.0, 1.5)], &[(101.0, 0.7)]);
        let b = book(&[(100.0, 0.5), (98.0, 2.2)], &[(101.0, 1.3)]);
        let c = book(&[(100.0, 0.25)], &[(104.0, 9.0)]);

        let left = merge([merge([a.clone(), b.clone()]), c.clone()]);
        let right = merge([a, b, c]);
        assert_eq!(left, right);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge(Vec::new()).is_empty());
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings() {
        let adapters = vec![
            ok_adapter("alpha", book(&[(100.0, 1.0)], &[(101.0, 1.0)])),
            failing_adapter("beta"),
            ok_adapter("gamma", book(&[(100.0, 2.0)], &[(101.5, 3.0)])),
        ];

        let agg = aggregate(&adapters, &FetchOptions::default()).await;

        assert_eq!(agg.failures.len(), 1);
        assert_eq!(agg.failures[0].venue, "beta");
        assert_eq!(agg.merged_venues.len(), 2);
        assert_eq!(agg.book.best_bid(), Some((100.0, 3.0)));
    }

    #[tokio::test]
    async fn zero_successes_yield_empty_book() {
        let adapters = vec![failing_adapter("alpha"), failing_adapter("beta")];

        let agg = aggregate(&adapters, &FetchOptions::default()).await;

        assert!(agg.book.is_empty());
        assert_eq!(agg.failures.len(), 2);
        assert!(agg.merged_venues.is_empty());
    }

    #[tokio::test]
    async fn every_adapter_gets_exactly_one_outcome() {
        let adapters: Vec<Box<dyn VenueAdapter>> = (0..12)
            .map(|i| {
                let names = [
                    "v0", "v1", "v2", "v3", "v4", "v5", "v6", "v7", "v8", "v9", "v10", "v11",
                ];
                ok_adapter(names[i], book(&[(100.0, 1.0)], &[]))
            })
            .collect();

        let opts = FetchOptions {
            max_concurrent: 3,
            ..FetchOptions::default()
        };
        let outcomes = fetch_all(&adapters, &opts).await;

        assert_eq!(outcomes.len(), 12);
        let mut venues: Vec<&str> = outcomes.iter().map(|o| o.venue).collect();
        venues.sort_unstable();
        venues.dedup();
        assert_eq!(venues.len(), 12, "no outcome lost or duplicated");
    }

    struct SlowVenue;

    #[async_trait]
    impl VenueAdapter for SlowVenue {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(OrderBook::new())
        }
    }

    #[tokio::test]
    async fn slow_venue_times_out_as_venue_error() {
        let adapters: Vec<Box<dyn VenueAdapter>> = vec![Box::new(SlowVenue)];
        let opts = FetchOptions {
            timeout: Duration::from_millis(20),
            ..FetchOptions::default()
        };

        let outcomes = fetch_all(&adapters, &opts).await;
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0].result,
            Err(VenueError::Timeout(20))
        ));
    }
}
