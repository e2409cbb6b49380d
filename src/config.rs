//! Configuration management for Unibook
//!
//! Loads from optional TOML files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::aggregate::FetchOptions;
use crate::types::Asset;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub venues: VenuesConfig,
    pub fetch: FetchConfig,
    pub quote: QuoteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Asset whose books are aggregated (BTC, ETH, SOL)
    pub asset: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenuesConfig {
    /// Enable the Binance snapshot adapter
    pub binance_enabled: bool,
    /// Enable the Coinbase snapshot adapter
    pub coinbase_enabled: bool,
    /// Enable the Gemini snapshot adapter
    pub gemini_enabled: bool,
    /// Enable the Kraken snapshot adapter
    pub kraken_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-venue fetch deadline in milliseconds
    pub timeout_ms: u64,
    /// Maximum venues fetched concurrently
    pub max_concurrent: usize,
    /// Depth limit requested from venues that support one
    pub depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteConfig {
    /// Quantity quoted when none is passed on the command line
    pub default_quantity: f64,
    /// Price levels per side shown in the console report
    pub report_levels: usize,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Market defaults
            .set_default("market.asset", "BTC")?
            // Venue defaults
            .set_default("venues.binance_enabled", true)?
            .set_default("venues.coinbase_enabled", true)?
            .set_default("venues.gemini_enabled", true)?
            .set_default("venues.kraken_enabled", true)?
            // Fetch defaults
            .set_default("fetch.timeout_ms", 10_000)?
            .set_default("fetch.max_concurrent", 8)?
            .set_default("fetch.depth", 500)?
            // Quote defaults
            .set_default("quote.default_quantity", 10.0)?
            .set_default("quote.report_levels", 2)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (UNIBOOK_*)
            .add_source(Environment::with_prefix("UNIBOOK").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        app_config.validate()?;

        Ok(app_config)
    }

    fn validate(&self) -> Result<()> {
        if Asset::from_str(&self.market.asset).is_none() {
            bail!("Unsupported asset: {}", self.market.asset);
        }
        if self.fetch.depth == 0 {
            bail!("fetch.depth must be at least 1");
        }
        Ok(())
    }

    /// Parsed asset; `load` already validated it
    pub fn asset(&self) -> Result<Asset> {
        Asset::from_str(&self.market.asset)
            .with_context(|| format!("Unsupported asset: {}", self.market.asset))
    }

    /// Fan-out bounds for the orchestrator
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_millis(self.fetch.timeout_ms),
            max_concurrent: self.fetch.max_concurrent,
        }
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "asset={} venues=[bnc:{} cb:{} gem:{} krk:{}] timeout_ms={} depth={}",
            self.market.asset,
            self.venues.binance_enabled,
            self.venues.coinbase_enabled,
            self.venues.gemini_enabled,
            self.venues.kraken_enabled,
            self.fetch.timeout_ms,
            self.fetch.depth
        )
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            market: MarketConfig {
                asset: "BTC".to_string(),
            },
            venues: VenuesConfig {
                binance_enabled: true,
                coinbase_enabled: true,
                gemini_enabled: true,
                kraken_enabled: true,
            },
            fetch: FetchConfig {
                timeout_ms: 1_000,
                max_concurrent: 8,
                depth: 50,
            },
            quote: QuoteConfig {
                default_quantity: 10.0,
                report_levels: 2,
            },
        }
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}
