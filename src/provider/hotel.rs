//! Hotel search. Search-style call, so the query goes in a POST body.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

use super::{Provider, ProviderKind, decode};
use crate::http::Request;
use crate::outcome::Outcome;

mod api {
    use serde::Deserialize;

    use super::HotelOffer;

    #[derive(Deserialize, Debug)]
    pub struct Search {
        pub hotels: Vec<HotelOffer>,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelSearch {
    pub city: String,
    pub check_in: String,
    pub check_out: String,
}

impl HotelSearch {
    pub fn new(
        city: impl Into<String>,
        check_in: impl Into<String>,
        check_out: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            check_in: check_in.into(),
            check_out: check_out.into(),
        }
    }
}

impl fmt::Display for HotelSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}..{}", self.city, self.check_in, self.check_out)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    pub id: String,
    pub name: String,
    pub stars: u8,
    pub price_per_night: f64,
    pub currency: String,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelResults {
    pub city: String,
    pub check_in: String,
    pub check_out: String,
    pub hotels: Vec<HotelOffer>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HotelProvider;

impl Provider for HotelProvider {
    type Query = HotelSearch;
    type Output = HotelResults;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Hotels
    }

    fn default_base_url(&self) -> &'static str {
        "https://api.booking.com/v1"
    }

    fn request(&self, query: &HotelSearch) -> Request {
        Request::post(
            ["hotels"],
            json!({
                "city": query.city,
                "check_in": query.check_in,
                "check_out": query.check_out,
            }),
        )
    }

    fn project(&self, query: &HotelSearch, body: Value) -> Outcome<HotelResults> {
        let search: api::Search = decode(body, "hotel search")?;
        Ok(HotelResults {
            city: query.city.clone(),
            check_in: query.check_in.clone(),
            check_out: query.check_out.clone(),
            hotels: search.hotels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ErrorKind;
    use reqwest::Method;

    fn search() -> HotelSearch {
        HotelSearch::new("Barcelona", "2025-06-01", "2025-06-05")
    }

    #[test]
    fn test_request_is_post_with_body() {
        let request = HotelProvider.request(&search());
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.segments, vec!["hotels"]);
        assert_eq!(
            request.body,
            Some(json!({
                "city": "Barcelona",
                "check_in": "2025-06-01",
                "check_out": "2025-06-05"
            }))
        );
    }

    #[test]
    fn test_project_offers() {
        let body = json!({
            "hotels": [{
                "id": "HT001",
                "name": "Grand Hotel Barcelona",
                "stars": 4,
                "price_per_night": 150.0,
                "currency": "EUR",
                "rating": 8.5
            }]
        });
        let results = HotelProvider.project(&search(), body).unwrap();
        assert_eq!(results.city, "Barcelona");
        assert_eq!(results.hotels.len(), 1);
        assert_eq!(results.hotels[0].stars, 4);
        assert_eq!(results.hotels[0].rating, 8.5);
    }

    #[test]
    fn test_project_missing_hotels_is_malformed() {
        let failure = HotelProvider
            .project(&search(), json!({"results": []}))
            .unwrap_err();
        assert_eq!(failure.kind(), ErrorKind::NotFoundOrMalformed);
    }
}
