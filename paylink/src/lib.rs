//! # Paylink
//!
//! A payment-link request form session: the user picks a currency, enters an
//! amount, a description and an expiry date; on submit the values are
//! validated and an external generator produces a shareable link.
//!
//! The session logic is a pure [`FormReducer`] hosted by the runtime's
//! `Store`; [`FormSession`] is the facade a front end talks to.
//!
//! ## Example
//!
//! ```ignore
//! use paylink::{Config, Field, FormSession};
//!
//! let config = Config::from_env()?;
//! let session = FormSession::start(config.home_currency.clone(), config.environment()).await?;
//!
//! session.update_field(Field::Amount, "100").await?;
//! session.update_field(Field::Description, "invoice").await?;
//!
//! let mut handle = session.submit().await?;
//! handle.wait().await;
//! println!("{}", paylink::view::render(&session.snapshot().await));
//! ```

pub mod config;
pub mod directory;
pub mod generator;
pub mod reducer;
pub mod session;
pub mod types;
pub mod validation;
pub mod view;

pub use config::{Config, ConfigError};
pub use directory::{ApyHubDirectory, CurrencyDirectory, DirectoryError, StaticDirectory};
pub use generator::{GenerationError, HttpLinkGenerator, LinkGenerator, MockLinkGenerator};
pub use reducer::{FormAction, FormEnvironment, FormReducer};
pub use session::{FormSession, SessionError};
pub use types::{
    Currency, DirectoryStatus, Field, FieldParseError, FormErrors, FormState, FormValues,
    LinkResult, SubmissionState,
};
pub use validation::validate;
