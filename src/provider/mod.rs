//! Provider descriptors for the external data APIs.
//!
//! Every provider is a thin specialisation of the same shape: build a
//! [`Request`] for a query, then project the JSON body into a narrow typed
//! result. Transport, classification and reporting live in
//! [`crate::client::ApiClient`].

mod country;
mod crypto;
mod currency;
mod flight;
mod hotel;
mod weather;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::http::Request;
use crate::outcome::{Failure, Outcome};

pub use country::{CountryInfo, CountryProvider, CountryQuery};
pub use crypto::{CoinQuery, CryptoPrice, CryptoProvider};
pub use currency::{CurrencyPair, CurrencyProvider, ExchangeRate};
pub use flight::{FlightOffer, FlightProvider, FlightResults, FlightSearch};
pub use hotel::{HotelOffer, HotelProvider, HotelResults, HotelSearch};
pub use weather::{CityQuery, CurrentWeather, WeatherProvider};

/// Provider kind identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Country,
    Crypto,
    Currency,
    Weather,
    Flights,
    Hotels,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::Country,
        ProviderKind::Crypto,
        ProviderKind::Currency,
        ProviderKind::Weather,
        ProviderKind::Flights,
        ProviderKind::Hotels,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Country => "country",
            ProviderKind::Crypto => "crypto",
            ProviderKind::Currency => "currency",
            ProviderKind::Weather => "weather",
            ProviderKind::Flights => "flights",
            ProviderKind::Hotels => "hotels",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor for one external API.
pub trait Provider: Send + Sync {
    /// Per-call input. Displayed in failure records.
    type Query: fmt::Display + Send + Sync;
    /// Narrow projected result.
    type Output: Send;

    fn kind(&self) -> ProviderKind;

    fn default_base_url(&self) -> &'static str;

    /// Builds the request for `query`, relative to the base URL.
    fn request(&self, query: &Self::Query) -> Request;

    /// Projects a parsed body into the result, or fails with
    /// [`crate::ErrorKind::NotFoundOrMalformed`].
    fn project(&self, query: &Self::Query, body: Value) -> Outcome<Self::Output>;
}

/// Deserializes a projection shape, mapping any mismatch to `NotFoundOrMalformed`.
pub(crate) fn decode<T: DeserializeOwned>(body: Value, what: &str) -> Outcome<T> {
    serde_json::from_value(body)
        .map_err(|e| Failure::malformed(format!("Unexpected {} response: {}", what, e)))
}

/// A JSON number, or a string holding one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// The finite value, if any. `"NaN"` and `"inf"` are rejected.
    pub(crate) fn value(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }
}
