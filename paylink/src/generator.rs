//! Link generation collaborators.
//!
//! Generating a link is an opaque external capability: given validated form
//! values it yields a shareable URL or fails as a whole.

use crate::types::FormValues;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Link generation result
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors from the link generator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Request never produced a response
    #[error("Link generation request failed: {0}")]
    RequestFailed(String),

    /// Service answered with a non-success status
    #[error("Link service error (status {status}): {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Link response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Service answered with an empty link
    #[error("Link service returned an empty link")]
    EmptyLink,
}

/// Produces a shareable payment link for validated form values
pub trait LinkGenerator: Send + Sync {
    /// Generate a link for `values`
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] when no link could be produced.
    fn generate(
        &self,
        values: FormValues,
    ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send>>;
}

/// Mock generator for development
///
/// Always succeeds with `<base_url>/pay/<uuid>` after a simulated latency.
#[derive(Clone, Debug)]
pub struct MockLinkGenerator {
    base_url: String,
    latency: Duration,
}

impl MockLinkGenerator {
    /// Creates a mock generator rooted at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            latency: Duration::ZERO,
        }
    }

    /// Simulate network latency on every call
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn LinkGenerator> {
        Arc::new(self)
    }
}

impl LinkGenerator for MockLinkGenerator {
    fn generate(
        &self,
        values: FormValues,
    ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send>> {
        let base_url = self.base_url.clone();
        let latency = self.latency;

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }

            let link = format!("{base_url}/pay/{}", uuid::Uuid::new_v4());

            tracing::info!(
                currency = %values.currency,
                amount = %values.amount,
                link = %link,
                "Mock payment link generated"
            );

            Ok(link)
        })
    }
}

#[derive(Deserialize)]
struct GeneratedLink {
    link: String,
}

/// Generator backed by an HTTP endpoint
///
/// Posts the form values as camelCase JSON and expects `{"link": "<url>"}`.
#[derive(Clone, Debug)]
pub struct HttpLinkGenerator {
    client: Client,
    endpoint: String,
}

impl HttpLinkGenerator {
    /// Creates a generator posting to `endpoint`
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn request(client: Client, endpoint: String, values: FormValues) -> GenerationResult<String> {
        let response = client
            .post(&endpoint)
            .json(&values)
            .send()
            .await
            .map_err(|e| GenerationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service {
                status: status.as_u16(),
                message: body,
            });
        }

        let generated = response
            .json::<GeneratedLink>()
            .await
            .map_err(|e| GenerationError::ResponseParseFailed(e.to_string()))?;

        let link = generated.link.trim();
        if link.is_empty() {
            return Err(GenerationError::EmptyLink);
        }

        Ok(link.to_string())
    }
}

impl LinkGenerator for HttpLinkGenerator {
    fn generate(
        &self,
        values: FormValues,
    ) -> Pin<Box<dyn Future<Output = GenerationResult<String>> + Send>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        Box::pin(async move {
            tracing::debug!(endpoint = %endpoint, "Requesting payment link");
            Self::request(client, endpoint, values).await
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_links_are_unique_and_rooted() {
        let generator = MockLinkGenerator::new("https://pay.example.com/");

        let first = generator.generate(FormValues::default()).await.unwrap();
        let second = generator.generate(FormValues::default()).await.unwrap();

        assert!(first.starts_with("https://pay.example.com/pay/"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn mock_latency_is_simulated() {
        let generator = MockLinkGenerator::new("https://pay.example.com")
            .with_latency(Duration::from_millis(20));

        let start = std::time::Instant::now();
        generator.generate(FormValues::default()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
