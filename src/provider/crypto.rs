//! Coin market data from CoinGecko.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use super::{Provider, ProviderKind, decode};
use crate::http::Request;
use crate::outcome::{Failure, Outcome};

/// Quote currency used for price and market cap.
pub const QUOTE_CURRENCY: &str = "usd";

mod api {
    use serde::Deserialize;
    use serde_json::Value;
    use std::collections::HashMap;

    #[derive(Deserialize, Debug)]
    pub struct Coin {
        pub market_data: MarketData,
    }

    #[derive(Deserialize, Debug)]
    pub struct MarketData {
        pub current_price: HashMap<String, Value>,
        pub market_cap: HashMap<String, Value>,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinQuery {
    pub id: String,
}

impl CoinQuery {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl fmt::Display for CoinQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoPrice {
    pub price: f64,
    pub market_cap: f64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CryptoProvider;

impl Provider for CryptoProvider {
    type Query = CoinQuery;
    type Output = CryptoPrice;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Crypto
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.coingecko.com/api/v3"
    }

    fn request(&self, query: &CoinQuery) -> Request {
        Request::get(["coins", query.id.as_str()])
    }

    fn project(&self, query: &CoinQuery, body: Value) -> Outcome<CryptoPrice> {
        let coin: api::Coin = decode(body, "coin")?;
        let quote = |table: &HashMap<String, Value>, field: &str| {
            table.get(QUOTE_CURRENCY).and_then(Value::as_f64).ok_or_else(|| {
                Failure::malformed(format!(
                    "No {} {} for coin {}",
                    QUOTE_CURRENCY, field, query.id
                ))
            })
        };

        Ok(CryptoPrice {
            price: quote(&coin.market_data.current_price, "price")?,
            market_cap: quote(&coin.market_data.market_cap, "market cap")?,
        })
    }
}
