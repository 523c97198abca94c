//! Service factory for building the integration clients.
//!
//! Construction of the shared HTTP client and the six provider clients is kept
//! apart from [`Config`]: services are built from configuration values but are
//! not part of the configuration itself.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;

use crate::client::{
    ApiClient, CountryClient, CryptoClient, CurrencyClient, FlightClient, HotelClient,
    WeatherClient,
};
use crate::config::Config;
use crate::http::HttpClient;
use crate::provider::{
    CountryProvider, CryptoProvider, CurrencyProvider, FlightProvider, HotelProvider, Provider,
    WeatherProvider,
};
use crate::report::{LogReporter, Reporter};

/// Build one provider client from configuration.
fn build_client<P: Provider>(
    provider: P,
    http: &HttpClient,
    config: &Config,
    reporter: &Arc<dyn Reporter>,
) -> Result<ApiClient<P>> {
    let kind = provider.kind();
    let base_url = config.endpoints.get(kind).to_string();
    debug!("Building {} client against {}", kind, base_url);

    Ok(ApiClient::with_base_url(provider, http.clone(), &base_url)
        .with_context(|| format!("Invalid {} endpoint", kind))?
        .retry_policy(config.retry_policy())
        .reporter(Arc::clone(reporter)))
}

/// All integration clients, sharing one connection pool.
pub struct Services {
    pub country: CountryClient,
    pub crypto: CryptoClient,
    pub currency: CurrencyClient,
    pub weather: WeatherClient,
    pub flights: FlightClient,
    pub hotels: HotelClient,
}

impl Services {
    /// Build services that log failures through `tracing`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_reporter(config, Arc::new(LogReporter))
    }

    /// Build services that send failure records to `reporter`.
    pub fn with_reporter(config: &Config, reporter: Arc<dyn Reporter>) -> Result<Self> {
        let http = HttpClient::with_timeout(config.timeout())?;

        Ok(Self {
            country: build_client(CountryProvider, &http, config, &reporter)?,
            crypto: build_client(CryptoProvider, &http, config, &reporter)?,
            currency: build_client(CurrencyProvider, &http, config, &reporter)?,
            weather: build_client(WeatherProvider, &http, config, &reporter)?,
            flights: build_client(FlightProvider, &http, config, &reporter)?,
            hotels: build_client(HotelProvider, &http, config, &reporter)?,
        })
    }
}
