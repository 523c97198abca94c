//! Flight search.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{Provider, ProviderKind, decode};
use crate::http::Request;
use crate::outcome::Outcome;

mod api {
    use serde::Deserialize;

    use super::FlightOffer;

    #[derive(Deserialize, Debug)]
    pub struct Search {
        pub flights: Vec<FlightOffer>,
        pub currency: Option<String>,
    }
}

/// IATA airport codes and a `YYYY-MM-DD` travel date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSearch {
    pub origin: String,
    pub destination: String,
    pub date: String,
}

impl FlightSearch {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            date: date.into(),
        }
    }
}

impl fmt::Display for FlightSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{} on {}", self.origin, self.destination, self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub id: String,
    pub airline: String,
    pub airline_code: String,
    pub price: f64,
    pub currency: String,
    pub departure: String,
    pub arrival: String,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightResults {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub currency: Option<String>,
    pub flights: Vec<FlightOffer>,
}

impl FlightResults {
    /// The lowest-priced offer, if any.
    pub fn cheapest(&self) -> Option<&FlightOffer> {
        self.flights
            .iter()
            .min_by(|a, b| a.price.total_cmp(&b.price))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FlightProvider;

impl Provider for FlightProvider {
    type Query = FlightSearch;
    type Output = FlightResults;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Flights
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.amadeus.com/v2"
    }

    fn request(&self, query: &FlightSearch) -> Request {
        Request::get(["flights"])
            .query("origin", query.origin.as_str())
            .query("destination", query.destination.as_str())
            .query("date", query.date.as_str())
    }

    fn project(&self, query: &FlightSearch, body: Value) -> Outcome<FlightResults> {
        let search: api::Search = decode(body, "flight search")?;
        Ok(FlightResults {
            origin: query.origin.clone(),
            destination: query.destination.clone(),
            date: query.date.clone(),
            currency: search.currency,
            flights: search.flights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ErrorKind;
    use serde_json::json;

    fn search() -> FlightSearch {
        FlightSearch::new("BEG", "BCN", "2025-06-01")
    }

    fn offer(id: &str, price: f64) -> Value {
        json!({
            "id": id,
            "airline": "Air Serbia",
            "airline_code": "JU",
            "price": price,
            "currency": "EUR",
            "departure": "14:00",
            "arrival": "16:30",
            "duration_minutes": 150
        })
    }

    #[test]
    fn test_request_query_params() {
        let request = FlightProvider.request(&search());
        assert_eq!(request.segments, vec!["flights"]);
        assert_eq!(
            request.query,
            vec![
                ("origin".to_string(), "BEG".to_string()),
                ("destination".to_string(), "BCN".to_string()),
                ("date".to_string(), "2025-06-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_project_offers() {
        let body = json!({
            "flights": [offer("FL001", 250.0), offer("FL002", 180.0)],
            "currency": "EUR"
        });
        let results = FlightProvider.project(&search(), body).unwrap();
        assert_eq!(results.origin, "BEG");
        assert_eq!(results.destination, "BCN");
        assert_eq!(results.currency.as_deref(), Some("EUR"));
        assert_eq!(results.flights.len(), 2);
        assert_eq!(results.flights[0].duration_minutes, 150);
        assert_eq!(results.cheapest().unwrap().id, "FL002");
    }

    #[test]
    fn test_project_no_flights_is_empty_result() {
        let results = FlightProvider
            .project(&search(), json!({"flights": []}))
            .unwrap();
        assert!(results.flights.is_empty());
        assert!(results.cheapest().is_none());
    }

    #[test]
    fn test_project_missing_flights_is_malformed() {
        let failure = FlightProvider
            .project(&search(), json!({"data": []}))
            .unwrap_err();
        assert_eq!(failure.kind(), ErrorKind::NotFoundOrMalformed);
    }

    #[test]
    fn test_project_string_price_is_malformed() {
        let mut bad = offer("FL001", 1.0);
        bad["price"] = json!("250.00");
        let failure = FlightProvider
            .project(&search(), json!({"flights": [bad]}))
            .unwrap_err();
        assert_eq!(failure.kind(), ErrorKind::NotFoundOrMalformed);
    }
}
