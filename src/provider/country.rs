//! Country facts from restcountries.com.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::{Provider, ProviderKind, decode};
use crate::http::Request;
use crate::outcome::{Failure, Outcome};

mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Country {
        #[serde(default)]
        pub capital: Vec<String>,
        pub population: u64,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryQuery {
    pub name: String,
}

impl CountryQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for CountryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryInfo {
    pub capital: String,
    pub population: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CountryProvider;

impl Provider for CountryProvider {
    type Query = CountryQuery;
    type Output = CountryInfo;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Country
    }

    fn default_base_url(&self) -> &'static str {
        "https://restcountries.com/v3.1"
    }

    fn request(&self, query: &CountryQuery) -> Request {
        Request::get(["name", query.name.as_str()])
    }

    fn project(&self, query: &CountryQuery, body: Value) -> Outcome<CountryInfo> {
        let matches: Vec<Value> = decode(body, "country")?;
        let first = matches
            .into_iter()
            .next()
            .ok_or_else(|| Failure::malformed(format!("Country {} not found", query.name)))?;
        let country: api::Country = decode(first, "country")?;
        let capital = country.capital.into_iter().next().ok_or_else(|| {
            Failure::malformed(format!("Country {} has no capital listed", query.name))
        })?;

        Ok(CountryInfo {
            capital,
            population: country.population,
        })
    }
}
