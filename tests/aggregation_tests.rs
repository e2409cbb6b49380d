//! End-to-end tests for the aggregation cycle

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::time::Duration;

    use unibook::aggregate::{aggregate, FetchOptions};
    use unibook::book::OrderBook;
    use unibook::quote::{quote, QuoteOutcome};
    use unibook::types::Side;
    use unibook::venues::{VenueAdapter, VenueError};

    struct StaticVenue {
        name: &'static str,
        bids: Vec<(f64, f64)>,
        asks: Vec<(f64, f64)>,
    }

    #[async_trait]
    impl VenueAdapter for StaticVenue {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
            let mut book = OrderBook::new();
            for &(p, q) in &self.bids {
                book.add_bid(p, q);
            }
            for &(p, q) in &self.asks {
                book.add_ask(p, q);
            }
            Ok(book)
        }
    }

    struct FailingVenue {
        name: &'static str,
    }

    #[async_trait]
    impl VenueAdapter for FailingVenue {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
            Err(VenueError::MalformedSnapshot("truncated body".to_string()))
        }
    }

    fn three_venues_one_failing() -> Vec<Box<dyn VenueAdapter>> {
        vec![
            Box::new(StaticVenue {
                name: "alpha",
                bids: vec![(64000.0, 1.0), (63990.0, 2.0)],
                asks: vec![(64010.0, 1.5)],
            }),
            Box::new(FailingVenue { name: "beta" }),
            Box::new(StaticVenue {
                name: "gamma",
                bids: vec![(64000.0, 0.5)],
                asks: vec![(64010.0, 0.5), (64020.0, 4.0)],
            }),
        ]
    }

    #[tokio::test]
    async fn partial_venue_failure_still_produces_a_book() {
        let agg = aggregate(&three_venues_one_failing(), &FetchOptions::default()).await;

        assert_eq!(agg.failures.len(), 1);
        assert_eq!(agg.failures[0].venue, "beta");
        assert_eq!(agg.merged_venues.len(), 2);

        // Equal prices from alpha and gamma land on shared levels.
        assert_eq!(agg.book.best_bid(), Some((64000.0, 1.5)));
        assert_eq!(agg.book.best_ask(), Some((64010.0, 2.0)));
        assert_eq!(agg.book.bid_depth(), 2);
        assert_eq!(agg.book.ask_depth(), 2);
    }

    #[tokio::test]
    async fn merged_book_quotes_across_venues() {
        let agg = aggregate(&three_venues_one_failing(), &FetchOptions::default()).await;

        // Buy 3: 2.0 at 64010 then 1.0 at 64020.
        let q = quote(&agg.book, 3.0, Side::Buy).unwrap();
        match q.outcome {
            QuoteOutcome::Filled { vwap } => {
                let expected = (2.0 * 64010.0 + 1.0 * 64020.0) / 3.0;
                assert!((vwap - expected).abs() < 1e-9);
            }
            other => panic!("expected fill, got {other:?}"),
        }

        // Sell far more than both venues hold.
        let q = quote(&agg.book, 100.0, Side::Sell).unwrap();
        assert!(matches!(
            q.outcome,
            QuoteOutcome::InsufficientLiquidity { available } if (available - 3.5).abs() < 1e-9
        ));
    }

    #[tokio::test]
    async fn all_venues_failing_degrades_to_empty_book() {
        let adapters: Vec<Box<dyn VenueAdapter>> = vec![
            Box::new(FailingVenue { name: "alpha" }),
            Box::new(FailingVenue { name: "beta" }),
        ];

        let agg = aggregate(&adapters, &FetchOptions::default()).await;
        assert_eq!(agg.failures.len(), 2);
        assert_eq!(agg.book.bid_depth(), 0);
        assert_eq!(agg.book.ask_depth(), 0);

        // Any positive quantity against the empty book is unfillable.
        for qty in [0.001, 1.0, 1_000_000.0] {
            let q = quote(&agg.book, qty, Side::Buy).unwrap();
            assert!(matches!(
                q.outcome,
                QuoteOutcome::InsufficientLiquidity { .. }
            ));
        }
    }

    struct SlowVenue {
        name: &'static str,
        delay: Duration,
    }

    #[async_trait]
    impl VenueAdapter for SlowVenue {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_book(&self) -> Result<OrderBook, VenueError> {
            tokio::time::sleep(self.delay).await;
            Ok(OrderBook::new())
        }
    }

    #[tokio::test]
    async fn one_slow_venue_times_out_without_starving_the_rest() {
        let adapters: Vec<Box<dyn VenueAdapter>> = vec![
            Box::new(SlowVenue {
                name: "slow",
                delay: Duration::from_millis(500),
            }),
            Box::new(StaticVenue {
                name: "fast",
                bids: vec![(100.0, 1.0)],
                asks: vec![(101.0, 1.0)],
            }),
        ];

        let opts = FetchOptions {
            timeout: Duration::from_millis(50),
            ..FetchOptions::default()
        };
        let agg = aggregate(&adapters, &opts).await;

        assert_eq!(agg.merged_venues, vec!["fast"]);
        assert_eq!(agg.failures.len(), 1);
        assert_eq!(agg.failures[0].venue, "slow");
        assert!(matches!(agg.failures[0].error, VenueError::Timeout(50)));
        assert_eq!(agg.book.best_bid(), Some((100.0, 1.0)));
    }
}
