//! Shared HTTP plumbing for the REST fetchers.
//!
//! Wraps `reqwest` GET requests with a bounded retry loop so that transient
//! network failures are masked automatically. Retries on network errors, 5xx,
//! and 429 responses (honoring `Retry-After`); everything else is final.

use super::FetchOutcome;
use crate::Result;
use core::time::Duration;
use ohno::{EnrichableExt, app_err};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;

const LOG_TARGET: &str = "      http";

/// Timeout applied to each individual HTTP request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum retry attempts (on top of the original request).
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between retries.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default delay for rate-limited responses without a `Retry-After` header.
const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(5);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("pkg-pulse/", env!("CARGO_PKG_VERSION"));

/// How to proceed after a request attempt.
enum Recovery {
    Retry(Option<Duration>),
    Never,
}

/// Build the shared HTTP client used by the REST fetchers.
pub fn client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).timeout(REQUEST_TIMEOUT).build()?)
}

/// Parse the `Retry-After` header value as seconds.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let s = headers.get(reqwest::header::RETRY_AFTER).and_then(|h| h.to_str().ok())?;
    s.parse::<u64>().ok()
}

/// Classify a request attempt for retry purposes.
fn classify(result: &Result<Response, reqwest::Error>) -> Recovery {
    match result {
        // Network / connection errors are always transient.
        Err(_) => Recovery::Retry(None),

        // Server errors (5xx) are transient.
        Ok(resp) if resp.status().is_server_error() => Recovery::Retry(None),

        // Rate-limited (429) - honor Retry-After if present.
        Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
            let delay = parse_retry_after(resp.headers()).map_or(DEFAULT_RATE_LIMIT_DELAY, Duration::from_secs);
            Recovery::Retry(Some(delay))
        }

        // Everything else (success, 4xx client errors) is not retried.
        _ => Recovery::Never,
    }
}

/// Send a GET request and deserialize the JSON response body.
///
/// Maps HTTP 404 to [`FetchOutcome::NotFound`]; all other failures, including
/// exhausted retries and undecodable bodies, become [`FetchOutcome::Error`].
/// `context` identifies the request in logs and error messages.
pub async fn get_json<T>(client: &Client, url: &str, context: &str) -> FetchOutcome<T>
where
    T: DeserializeOwned,
{
    let mut attempt = 0;
    loop {
        let result = client.get(url).send().await;

        if attempt < MAX_RETRY_ATTEMPTS
            && let Recovery::Retry(delay) = classify(&result)
        {
            let delay = delay.unwrap_or_else(|| RETRY_BASE_DELAY * 2_u32.saturating_pow(attempt));
            log::debug!(
                target: LOG_TARGET,
                "retrying GET for {context} (attempt {}, delay {}ms)",
                attempt + 1,
                delay.as_millis(),
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
            continue;
        }

        return match result {
            Ok(resp) if resp.status() == StatusCode::NOT_FOUND => {
                log::info!(target: LOG_TARGET, "{context}: not found (404)");
                FetchOutcome::NotFound
            }
            Ok(resp) if resp.status().is_success() => match resp.json::<T>().await {
                Ok(data) => FetchOutcome::Found(data),
                Err(e) => FetchOutcome::Error(Arc::new(
                    ohno::AppError::from(e).enrich_with(|| format!("unable to decode response for {context}")),
                )),
            },
            Ok(resp) => FetchOutcome::Error(Arc::new(app_err!("request for {context} failed with HTTP status {}", resp.status()))),
            Err(e) => FetchOutcome::Error(Arc::new(
                ohno::AppError::from(e).enrich_with(|| format!("unable to fetch {context}")),
            )),
        };
    }
}
