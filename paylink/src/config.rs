//! Configuration management for the payment-link form.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::directory::{APYHUB_CURRENCY_URL, ApyHubDirectory, CurrencyDirectory, StaticDirectory};
use crate::generator::{HttpLinkGenerator, LinkGenerator, MockLinkGenerator};
use crate::reducer::FormEnvironment;
use paylink_core::environment::SystemClock;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Home currency empty or not an alphabetic code
    #[error("Invalid PAYLINK_HOME_CURRENCY: {0:?}")]
    InvalidHomeCurrency(String),
}

/// Application configuration loaded from environment variables.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// `ApyHub` API key; no key means the offline directory is used
    pub apyhub_api_key: Option<String>,
    /// `ApyHub` currency dictionary endpoint
    pub apyhub_currency_url: String,
    /// Currency preselected in new sessions
    pub home_currency: String,
    /// Link generation endpoint; no endpoint means the mock generator is used
    pub generator_url: Option<String>,
    /// Base of links produced by the mock generator
    pub link_base_url: String,
    /// Simulated latency of the mock generator
    pub generator_latency: Duration,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable holds an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values count as unset. Unparseable numbers fall back to their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHomeCurrency`] when the home currency is
    /// set but blank or not alphabetic.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let home_currency = match lookup("PAYLINK_HOME_CURRENCY") {
            None => "NGN".to_string(),
            Some(code) => {
                let code = code.trim();
                if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(ConfigError::InvalidHomeCurrency(code.to_string()));
                }
                code.to_ascii_uppercase()
            },
        };

        Ok(Self {
            apyhub_api_key: var("APYHUB_API_KEY"),
            apyhub_currency_url: var("APYHUB_CURRENCY_URL")
                .unwrap_or_else(|| APYHUB_CURRENCY_URL.to_string()),
            home_currency,
            generator_url: var("PAYLINK_GENERATOR_URL"),
            link_base_url: var("PAYLINK_LINK_BASE_URL")
                .unwrap_or_else(|| "https://pay.example.com".to_string()),
            generator_latency: Duration::from_millis(
                var("PAYLINK_GENERATOR_LATENCY_MS")
                    .and_then(|ms| ms.trim().parse().ok())
                    .unwrap_or(300),
            ),
        })
    }

    /// Currency directory selected by this configuration
    #[must_use]
    pub fn directory(&self) -> Arc<dyn CurrencyDirectory> {
        match &self.apyhub_api_key {
            Some(key) => Arc::new(ApyHubDirectory::with_url(key.clone(), self.apyhub_currency_url.clone())),
            None => StaticDirectory::common().shared(),
        }
    }

    /// Link generator selected by this configuration
    #[must_use]
    pub fn generator(&self) -> Arc<dyn LinkGenerator> {
        match &self.generator_url {
            Some(url) => Arc::new(HttpLinkGenerator::new(url.clone())),
            None => MockLinkGenerator::new(self.link_base_url.clone())
                .with_latency(self.generator_latency)
                .shared(),
        }
    }

    /// Production environment for a form session
    #[must_use]
    pub fn environment(&self) -> FormEnvironment {
        FormEnvironment::new(Arc::new(SystemClock), self.directory(), self.generator())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("apyhub_api_key", &self.apyhub_api_key.as_ref().map(|_| "<redacted>"))
            .field("apyhub_currency_url", &self.apyhub_currency_url)
            .field("home_currency", &self.home_currency)
            .field("generator_url", &self.generator_url)
            .field("link_base_url", &self.link_base_url)
            .field("generator_latency", &self.generator_latency)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.apyhub_api_key, None);
        assert_eq!(config.apyhub_currency_url, APYHUB_CURRENCY_URL);
        assert_eq!(config.home_currency, "NGN");
        assert_eq!(config.generator_url, None);
        assert_eq!(config.link_base_url, "https://pay.example.com");
        assert_eq!(config.generator_latency, Duration::from_millis(300));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("APYHUB_API_KEY", "secret"),
            ("PAYLINK_HOME_CURRENCY", "usd"),
            ("PAYLINK_GENERATOR_URL", "http://localhost:9000/links"),
            ("PAYLINK_GENERATOR_LATENCY_MS", "25"),
        ]))
        .unwrap();

        assert_eq!(config.apyhub_api_key.as_deref(), Some("secret"));
        assert_eq!(config.home_currency, "USD");
        assert_eq!(config.generator_url.as_deref(), Some("http://localhost:9000/links"));
        assert_eq!(config.generator_latency, Duration::from_millis(25));
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn bad_latency_falls_back() {
        let config = Config::from_lookup(lookup(&[("PAYLINK_GENERATOR_LATENCY_MS", "soon")])).unwrap();
        assert_eq!(config.generator_latency, Duration::from_millis(300));
    }

    #[test]
    fn rejects_bad_home_currency() {
        assert_eq!(
            Config::from_lookup(lookup(&[("PAYLINK_HOME_CURRENCY", "  ")])),
            Err(ConfigError::InvalidHomeCurrency(String::new()))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("PAYLINK_HOME_CURRENCY", "N6N")])),
            Err(ConfigError::InvalidHomeCurrency("N6N".to_string()))
        );
    }

    #[test]
    fn empty_api_key_means_offline() {
        let config = Config::from_lookup(lookup(&[("APYHUB_API_KEY", "")])).unwrap();
        assert_eq!(config.apyhub_api_key, None);
    }
}
