//! HTTP transport that turns every response into a classified [`Outcome`].

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, Method, Url};
use serde_json::Value;
use std::time::Duration;

use crate::outcome::{ErrorKind, Failure, Outcome};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const USER_AGENT: &str = "tripdesk";

/// A request relative to a provider's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Path segments appended to the base URL. Percent-encoded on send.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::GET,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get(segments)
        }
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Resolves the request path against `base`, tolerating a trailing slash.
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&self.segments);
        }
        url
    }
}

/// Parses and checks a provider base URL.
pub fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Base URL {} cannot carry a path", base_url);
    }
    Ok(url)
}

/// Maps a transport-level error to a failure kind.
pub fn classify_error(error: &reqwest::Error) -> Failure {
    if error.is_timeout() {
        return Failure::timeout(format!("No response within timeout: {}", error));
    }
    if let Some(status) = error.status() {
        return Failure::from_status(status.as_u16(), error.to_string());
    }
    if error.is_builder() {
        return Failure::new(ErrorKind::ClientError, format!("Invalid request: {}", error));
    }
    if error.is_decode() {
        return Failure::malformed(format!("Unreadable response body: {}", error));
    }
    Failure::unavailable(format!("Request failed: {}", error))
}

/// Shared HTTP client. Cheap to clone.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client whose every request is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::new(client))
    }

    /// Issues exactly one request and parses the body as JSON.
    #[tracing::instrument(skip(self, base, request), fields(method = %request.method))]
    pub async fn send_json(&self, base: &Url, request: &Request) -> Outcome<Value> {
        let url = request.url(base);
        debug!("{} {}...", request.method, url);

        let mut builder = self.client.request(request.method.clone(), url.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| classify_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Failure::from_status(
                status.as_u16(),
                format!("HTTP {} from {}", status, url),
            ));
        }

        let bytes = response.bytes().await.map_err(|e| classify_error(&e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Failure::malformed(format!("Response from {} is not JSON: {}", url, e)))
    }
}
