//! Generic external API client.
//!
//! [`ApiClient`] pairs a [`Provider`] descriptor with the shared transport.
//! It issues one request per [`ApiClient::fetch`], projects the body, and
//! reports every failure to the injected [`Reporter`] before returning it.

use anyhow::Result;
use reqwest::Url;
use std::sync::Arc;

use crate::http::{HttpClient, RetryPolicy, Sleeper, TokioSleeper, parse_base_url};
use crate::outcome::{ErrorKind, Failure, Outcome};
use crate::provider::{
    CountryProvider, CryptoProvider, CurrencyProvider, FlightProvider, HotelProvider, Provider,
    WeatherProvider,
};
use crate::report::{FailureRecord, LogReporter, Reporter};

pub type CountryClient = ApiClient<CountryProvider>;
pub type CryptoClient = ApiClient<CryptoProvider>;
pub type CurrencyClient = ApiClient<CurrencyProvider>;
pub type WeatherClient = ApiClient<WeatherProvider>;
pub type FlightClient = ApiClient<FlightProvider>;
pub type HotelClient = ApiClient<HotelProvider>;

pub struct ApiClient<P: Provider> {
    provider: P,
    http: HttpClient,
    base_url: Url,
    retry: RetryPolicy,
    reporter: Arc<dyn Reporter>,
    sleeper: Arc<dyn Sleeper>,
}

impl<P: Provider> ApiClient<P> {
    /// Creates a client against the provider's default base URL.
    pub fn new(provider: P, http: HttpClient) -> Result<Self> {
        let base_url = provider.default_base_url();
        Self::with_base_url(provider, http, base_url)
    }

    /// Creates a client against a custom base URL.
    pub fn with_base_url(provider: P, http: HttpClient, base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            provider,
            http,
            retry: RetryPolicy::default(),
            reporter: Arc::new(LogReporter),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Single attempt: one request, projection, classification.
    #[tracing::instrument(skip_all, fields(provider = %self.provider.kind(), query = %query))]
    pub async fn fetch(&self, query: &P::Query) -> Outcome<P::Output> {
        let outcome = self.attempt(query).await;
        if let Err(failure) = &outcome {
            self.report(query, failure);
        }
        outcome
    }

    /// [`ApiClient::fetch`] under the client's retry policy.
    #[tracing::instrument(skip_all, fields(provider = %self.provider.kind(), query = %query))]
    pub async fn fetch_with_retry(&self, query: &P::Query) -> Outcome<P::Output> {
        let outcome = self
            .retry
            .run(self.provider.kind().as_str(), self.sleeper.as_ref(), || {
                self.fetch(query)
            })
            .await;
        if let Err(failure) = &outcome {
            if failure.kind() == ErrorKind::RetriesExhausted {
                self.report(query, failure);
            }
        }
        outcome
    }

    async fn attempt(&self, query: &P::Query) -> Outcome<P::Output> {
        let request = self.provider.request(query);
        let body = self.http.send_json(&self.base_url, &request).await?;
        self.provider.project(query, body)
    }

    fn report(&self, query: &P::Query, failure: &Failure) {
        let record = FailureRecord::new(self.provider.kind().as_str(), query.to_string(), failure);
        self.reporter.failure(&record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockSleeper;
    use crate::provider::{
        CityQuery, CoinQuery, CountryInfo, CountryQuery, CurrencyPair, FlightSearch, HotelSearch,
    };
    use crate::report::MockReporter;
    use mockall::predicate::eq;
    use reqwest::Client;
    use std::time::Duration;

    fn http() -> HttpClient {
        HttpClient::new(Client::new())
    }

    fn silent_reporter() -> Arc<dyn Reporter> {
        let mut reporter = MockReporter::new();
        reporter.expect_failure().never();
        Arc::new(reporter)
    }

    fn expect_one_failure(
        provider: &'static str,
        query: &'static str,
        kind: ErrorKind,
    ) -> Arc<dyn Reporter> {
        let mut reporter = MockReporter::new();
        reporter
            .expect_failure()
            .withf(move |r| r.provider == provider && r.query == query && r.kind == kind)
            .times(1)
            .return_const(());
        Arc::new(reporter)
    }

    #[test]
    fn test_new_uses_default_base_url() {
        let client = CountryClient::new(CountryProvider, http()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://restcountries.com/v3.1");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(CountryClient::with_base_url(CountryProvider, http(), "::nope").is_err());
    }

    #[tokio::test]
    async fn test_country_france() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/name/France")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"capital": ["Paris"], "population": 21610000}]"#)
            .create_async()
            .await;

        let client = CountryClient::with_base_url(CountryProvider, http(), &server.url())
            .unwrap()
            .reporter(silent_reporter());
        let info = client.fetch(&CountryQuery::new("France")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            info,
            CountryInfo {
                capital: "Paris".into(),
                population: 21610000
            }
        );
    }

    #[tokio::test]
    async fn test_country_not_found_is_client_error_and_reported() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/name/Atlantis")
            .with_status(404)
            .with_body(r#"{"status": 404, "message": "Not Found"}"#)
            .create_async()
            .await;

        let client = CountryClient::with_base_url(CountryProvider, http(), &server.url())
            .unwrap()
            .reporter(expect_one_failure("country", "Atlantis", ErrorKind::ClientError));
        let failure = client
            .fetch(&CountryQuery::new("Atlantis"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::ClientError);
    }

    #[tokio::test]
    async fn test_currency_unknown_target() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/USD")
            .with_status(200)
            .with_body(r#"{"rates": {}}"#)
            .create_async()
            .await;

        let client = CurrencyClient::with_base_url(CurrencyProvider, http(), &server.url())
            .unwrap()
            .reporter(expect_one_failure(
                "currency",
                "USD->FAKE",
                ErrorKind::NotFoundOrMalformed,
            ));
        let failure = client
            .fetch(&CurrencyPair::new("USD", "FAKE"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::NotFoundOrMalformed);
        assert!(failure.message().contains("FAKE"));
    }

    #[tokio::test]
    async fn test_crypto_numeric_fields() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/coins/bitcoin")
            .with_status(200)
            .with_body(
                r#"{"market_data": {"current_price": {"usd": 10000}, "market_cap": {"usd": 1000000000000}}}"#,
            )
            .create_async()
            .await;

        let client = CryptoClient::with_base_url(CryptoProvider, http(), &server.url())
            .unwrap()
            .reporter(silent_reporter());
        let price = client.fetch(&CoinQuery::new("bitcoin")).await.unwrap();

        let json = serde_json::to_value(&price).unwrap();
        assert_eq!(json["price"], serde_json::json!(10000.0));
        assert_eq!(json["market_cap"], serde_json::json!(1_000_000_000_000.0));
    }

    #[tokio::test]
    async fn test_weather_query_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/Berlin")
            .match_query(mockito::Matcher::UrlEncoded("format".into(), "j1".into()))
            .with_status(200)
            .with_body(
                r#"{"current_condition": [{"temp_C": "8", "weatherDesc": [{"value": "Light rain"}]}]}"#,
            )
            .create_async()
            .await;

        let client = WeatherClient::with_base_url(WeatherProvider, http(), &server.url())
            .unwrap()
            .reporter(silent_reporter());
        let weather = client.fetch(&CityQuery::new("Berlin")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(weather.temp_c, 8.0);
        assert_eq!(weather.condition, "Light rain");
    }

    #[tokio::test]
    async fn test_flight_search() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flights")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("origin".into(), "BEG".into()),
                mockito::Matcher::UrlEncoded("destination".into(), "BER".into()),
                mockito::Matcher::UrlEncoded("date".into(), "2024-03-01".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"flights": [{"id": "FL001", "airline": "Lufthansa", "airline_code": "LH",
                    "price": 250.0, "currency": "EUR", "departure": "08:00",
                    "arrival": "10:30", "duration_minutes": 150}], "currency": "EUR"}"#,
            )
            .create_async()
            .await;

        let client = FlightClient::with_base_url(FlightProvider, http(), &server.url())
            .unwrap()
            .reporter(silent_reporter());
        let results = client
            .fetch(&FlightSearch::new("BEG", "BER", "2024-03-01"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(results.flights[0].airline, "Lufthansa");
    }

    #[tokio::test]
    async fn test_hotel_search_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hotels")
            .match_body(mockito::Matcher::PartialJson(
                serde_json::json!({"city": "Barcelona"}),
            ))
            .with_status(200)
            .with_body(r#"{"hotels": []}"#)
            .create_async()
            .await;

        let client = HotelClient::with_base_url(HotelProvider, http(), &server.url())
            .unwrap()
            .reporter(silent_reporter());
        let results = client
            .fetch(&HotelSearch::new("Barcelona", "2025-06-01", "2025-06-05"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(results.hotels.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_with_retry_exhausts_on_server_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/name/France")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let mut reporter = MockReporter::new();
        reporter
            .expect_failure()
            .withf(|r| r.kind == ErrorKind::ServerError)
            .times(3)
            .return_const(());
        reporter
            .expect_failure()
            .withf(|r| r.kind == ErrorKind::RetriesExhausted)
            .times(1)
            .return_const(());

        let mut sleeper = MockSleeper::new();
        sleeper
            .expect_sleep()
            .with(eq(Duration::from_secs(1)))
            .times(1)
            .return_const(());
        sleeper
            .expect_sleep()
            .with(eq(Duration::from_secs(2)))
            .times(1)
            .return_const(());

        let client = CountryClient::with_base_url(CountryProvider, http(), &server.url())
            .unwrap()
            .reporter(Arc::new(reporter))
            .sleeper(Arc::new(sleeper));
        let failure = client
            .fetch_with_retry(&CountryQuery::new("France"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(failure.kind(), ErrorKind::RetriesExhausted);
        assert_eq!(failure.underlying(), Some(ErrorKind::ServerError));
        assert_eq!(failure.status(), Some(503));
    }

    #[tokio::test]
    async fn test_fetch_with_retry_does_not_repeat_client_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/nope")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let mut sleeper = MockSleeper::new();
        sleeper.expect_sleep().never();

        let client = CryptoClient::with_base_url(CryptoProvider, http(), &server.url())
            .unwrap()
            .reporter(expect_one_failure("crypto", "nope", ErrorKind::ClientError))
            .sleeper(Arc::new(sleeper));
        let failure = client
            .fetch_with_retry(&CoinQuery::new("nope"))
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(failure.kind(), ErrorKind::ClientError);
    }

    #[tokio::test]
    async fn test_fetch_with_single_attempt_policy() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/Oslo")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let mut reporter = MockReporter::new();
        reporter.expect_failure().times(2).return_const(());

        let client = WeatherClient::with_base_url(WeatherProvider, http(), &server.url())
            .unwrap()
            .reporter(Arc::new(reporter))
            .retry_policy(RetryPolicy::new(1, Duration::from_secs(1)));
        let failure = client
            .fetch_with_retry(&CityQuery::new("Oslo"))
            .await
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::RetriesExhausted);
        assert_eq!(failure.underlying(), Some(ErrorKind::ServerError));
    }
}
