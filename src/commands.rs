//! Lookups behind the command line.

use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::outcome::{Failure, Outcome};
use crate::provider::Provider;

/// Runs one provider lookup and renders the result as JSON.
///
/// With `retry` the client's retry policy applies; otherwise exactly one
/// request is sent.
pub async fn lookup<P>(client: &ApiClient<P>, query: &P::Query, retry: bool) -> Outcome<Value>
where
    P: Provider,
    P::Output: Serialize,
{
    let output = if retry {
        client.fetch_with_retry(query).await?
    } else {
        client.fetch(query).await?
    };
    serde_json::to_value(output).map_err(|e| {
        Failure::malformed(format!(
            "Failed to render {} result: {}",
            client.provider().kind(),
            e
        ))
    })
}
