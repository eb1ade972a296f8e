//! Currency directory collaborators.
//!
//! The directory is a read-only list of currencies fetched once per session.
//! [`ApyHubDirectory`] talks to the `ApyHub` dictionary service;
//! [`StaticDirectory`] serves a fixed list for offline use and tests.

use crate::types::Currency;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Default `ApyHub` currency dictionary endpoint
pub const APYHUB_CURRENCY_URL: &str = "https://api.apyhub.com/data/dictionary/currency";

/// Directory fetch result
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors from fetching the currency directory
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Request never produced a response
    #[error("Currency directory request failed: {0}")]
    Network(String),

    /// Service answered with a non-success status
    #[error("Currency directory error (status {status}): {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Currency directory response parsing failed: {0}")]
    Parse(String),
}

/// Read-only lookup of supported currencies
pub trait CurrencyDirectory: Send + Sync {
    /// Fetch every known currency
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] when the directory cannot be reached or
    /// its answer cannot be understood.
    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = DirectoryResult<Vec<Currency>>> + Send>>;
}

#[derive(Deserialize)]
struct DictionaryResponse {
    data: Vec<Currency>,
}

/// `ApyHub` currency dictionary client
#[derive(Clone)]
pub struct ApyHubDirectory {
    client: Client,
    api_key: String,
    url: String,
}

impl ApyHubDirectory {
    /// Create a client for the public endpoint
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(api_key, APYHUB_CURRENCY_URL)
    }

    /// Create a client for a specific endpoint
    #[must_use]
    pub fn with_url(api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            url: url.into(),
        }
    }

    async fn request(client: Client, api_key: String, url: String) -> DirectoryResult<Vec<Currency>> {
        let response = client
            .get(&url)
            .header("apy-token", api_key)
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Service {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .json::<DictionaryResponse>()
            .await
            .map(|body| body.data)
            .map_err(|e| DirectoryError::Parse(e.to_string()))
    }
}

impl std::fmt::Debug for ApyHubDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApyHubDirectory")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl CurrencyDirectory for ApyHubDirectory {
    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = DirectoryResult<Vec<Currency>>> + Send>> {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let url = self.url.clone();

        Box::pin(async move {
            tracing::debug!(url = %url, "Fetching currency directory");
            let currencies = Self::request(client, api_key, url).await?;
            tracing::debug!(count = currencies.len(), "Currency directory fetched");
            Ok(currencies)
        })
    }
}

/// Fixed in-memory directory
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    currencies: Arc<[Currency]>,
}

impl StaticDirectory {
    /// Directory serving exactly `currencies`
    #[must_use]
    pub fn new(currencies: Vec<Currency>) -> Self {
        Self {
            currencies: currencies.into(),
        }
    }

    /// A handful of widely used currencies
    #[must_use]
    pub fn common() -> Self {
        Self::new(vec![
            Currency::new("NGN", "₦", "🇳🇬", "Nigerian Naira"),
            Currency::new("USD", "$", "🇺🇸", "US Dollar"),
            Currency::new("EUR", "€", "🇪🇺", "Euro"),
            Currency::new("GBP", "£", "🇬🇧", "British Pound"),
            Currency::new("GHS", "₵", "🇬🇭", "Ghanaian Cedi"),
            Currency::new("KES", "KSh", "🇰🇪", "Kenyan Shilling"),
            Currency::new("ZAR", "R", "🇿🇦", "South African Rand"),
        ])
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn CurrencyDirectory> {
        Arc::new(self)
    }
}

impl CurrencyDirectory for StaticDirectory {
    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = DirectoryResult<Vec<Currency>>> + Send>> {
        let currencies = self.currencies.to_vec();
        Box::pin(async move { Ok(currencies) })
    }
}
