//! Exchange rates from open.er-api.com.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::{Provider, ProviderKind, decode};
use crate::http::Request;
use crate::outcome::{Failure, Outcome};

mod api {
    use serde::Deserialize;
    use serde_json::Value;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug)]
    pub struct Latest {
        pub rates: HashMap<String, Value>,
    }
}

/// ISO 4217 codes, e.g. `USD` to `EUR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl CurrencyPair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CurrencyProvider;

impl Provider for CurrencyProvider {
    type Query = CurrencyPair;
    type Output = ExchangeRate;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Currency
    }

    fn default_base_url(&self) -> &'static str {
        "https://open.er-api.com/v6/latest"
    }

    fn request(&self, query: &CurrencyPair) -> Request {
        Request::get([query.from.as_str()])
    }

    fn project(&self, query: &CurrencyPair, body: Value) -> Outcome<ExchangeRate> {
        let latest: api::Latest = decode(body, "exchange rate")?;
        let rate = latest.rates.get(&query.to).and_then(Value::as_f64).ok_or_else(|| {
            Failure::malformed(format!(
                "No exchange rate from {} to {}",
                query.from, query.to
            ))
        })?;

        Ok(ExchangeRate {
            from: query.from.clone(),
            to: query.to.clone(),
            rate,
        })
    }
}
