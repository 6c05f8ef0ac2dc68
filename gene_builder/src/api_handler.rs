// src/api_handler.rs

use std::cell::RefCell;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::GeneBuilderError;

/// Retry behaviour for rate-limited or flaky endpoints.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Exponential backoff schedule used when the provider rate-limits us
    /// without saying how long to wait.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Blocking HTTP client with bounded retry and a courtesy delay between
/// consecutive calls.
pub struct ApiHandler {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
    min_interval: Duration,
    last_request: RefCell<Option<Instant>>,
}

impl ApiHandler {
    pub fn new(
        base_url: &str,
        retry: RetryPolicy,
        min_interval: Duration,
    ) -> Result<Self, GeneBuilderError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("gene_builder/0.1"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| GeneBuilderError::Request {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            retry,
            min_interval,
            last_request: RefCell::new(None),
        })
    }

    pub fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, GeneBuilderError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let body = self.request_with_retry(&url)?;
        serde_json::from_str(&body).map_err(|source| GeneBuilderError::Decode { url, source })
    }

    fn request_with_retry(&self, url: &str) -> Result<String, GeneBuilderError> {
        for attempt in 0..self.retry.max_attempts {
            self.pause_between_calls();

            let response = match self.client.get(url).send() {
                Ok(response) => response,
                Err(source) => {
                    if attempt + 1 == self.retry.max_attempts {
                        return Err(GeneBuilderError::Request {
                            url: url.to_string(),
                            source,
                        });
                    }
                    warn!(url, attempt = attempt + 1, "request failed, retrying: {source}");
                    thread::sleep(self.retry.base_delay);
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return response.text().map_err(|source| GeneBuilderError::Request {
                    url: url.to_string(),
                    source,
                });
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let wait = retry_after(&response).unwrap_or_else(|| self.retry.backoff(attempt));
                warn!(url, "rate limited, waiting {}s before retrying", wait.as_secs());
                thread::sleep(wait);
                continue;
            }

            let body = response.text().unwrap_or_default();
            return Err(GeneBuilderError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        Err(GeneBuilderError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.retry.max_attempts,
        })
    }

    fn pause_between_calls(&self) {
        let mut last = self.last_request.borrow_mut();
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    let seconds = response
        .headers()
        .get("Retry-After")?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()?;
    Some(Duration::from_secs(seconds))
}
