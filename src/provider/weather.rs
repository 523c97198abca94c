//! Current conditions from wttr.in (`?format=j1`).

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::{Provider, ProviderKind, decode};
use crate::http::Request;
use crate::outcome::{Failure, Outcome};

mod api {
    use serde::Deserialize;

    use super::super::Numeric;

    #[derive(Deserialize, Debug)]
    pub struct Report {
        pub current_condition: Vec<Condition>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Condition {
        #[serde(rename = "temp_C")]
        pub temp_c: Numeric,
        #[serde(rename = "weatherDesc", default)]
        pub weather_desc: Vec<Text>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Text {
        pub value: String,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub city: String,
}

impl CityQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into() }
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.city)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temp_c: f64,
    pub condition: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherProvider;

impl Provider for WeatherProvider {
    type Query = CityQuery;
    type Output = CurrentWeather;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Weather
    }

    fn default_base_url(&self) -> &'static str {
        "https://wttr.in"
    }

    fn request(&self, query: &CityQuery) -> Request {
        Request::get([query.city.as_str()]).query("format", "j1")
    }

    fn project(&self, query: &CityQuery, body: Value) -> Outcome<CurrentWeather> {
        let report: api::Report = decode(body, "weather")?;
        let current = report.current_condition.into_iter().next().ok_or_else(|| {
            Failure::malformed(format!("No current conditions for {}", query.city))
        })?;
        let temp_c = current.temp_c.value().ok_or_else(|| {
            Failure::malformed(format!("Temperature for {} is not a number", query.city))
        })?;
        let condition = current
            .weather_desc
            .into_iter()
            .next()
            .map(|d| d.value)
            .ok_or_else(|| {
                Failure::malformed(format!("No weather description for {}", query.city))
            })?;

        Ok(CurrentWeather {
            city: query.city.clone(),
            temp_c,
            condition,
        })
    }
}
