//! Integration settings: timeout, retry policy, provider base URLs.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::http::{DEFAULT_TIMEOUT, INITIAL_BACKOFF, MAX_RETRIES, RetryPolicy};
use crate::provider::{
    CountryProvider, CryptoProvider, CurrencyProvider, FlightProvider, HotelProvider, Provider,
    ProviderKind, WeatherProvider,
};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "TRIPDESK_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timeout_secs: u64,
    pub retry: RetryConfig,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            retry: RetryConfig::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Loads a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.policy()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            initial_backoff_ms: INITIAL_BACKOFF.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_backoff_ms),
        )
    }
}

/// Base URL per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub country: String,
    pub crypto: String,
    pub currency: String,
    pub weather: String,
    pub flights: String,
    pub hotels: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            country: CountryProvider.default_base_url().to_string(),
            crypto: CryptoProvider.default_base_url().to_string(),
            currency: CurrencyProvider.default_base_url().to_string(),
            weather: WeatherProvider.default_base_url().to_string(),
            flights: FlightProvider.default_base_url().to_string(),
            hotels: HotelProvider.default_base_url().to_string(),
        }
    }
}

impl Endpoints {
    pub fn get(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::Country => &self.country,
            ProviderKind::Crypto => &self.crypto,
            ProviderKind::Currency => &self.currency,
            ProviderKind::Weather => &self.weather,
            ProviderKind::Flights => &self.flights,
            ProviderKind::Hotels => &self.hotels,
        }
    }

    pub fn set(&mut self, kind: ProviderKind, url: impl Into<String>) {
        let slot = match kind {
            ProviderKind::Country => &mut self.country,
            ProviderKind::Crypto => &mut self.crypto,
            ProviderKind::Currency => &mut self.currency,
            ProviderKind::Weather => &mut self.weather,
            ProviderKind::Flights => &mut self.flights,
            ProviderKind::Hotels => &mut self.hotels,
        };
        *slot = url.into();
    }
}
