//! Domain types for the payment-link form.
//!
//! Field values are kept as raw text exactly as typed; interpretation happens
//! in [`crate::validation`]. Everything the reducer needs to decide a
//! transition lives in [`FormState`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Calendar date format used by the expiry field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the four editable form fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// ISO currency code
    Currency,
    /// Numeric amount text
    Amount,
    /// Free-form description
    Description,
    /// Expiry date as `YYYY-MM-DD`
    ExpiryDate,
}

impl Field {
    /// All fields in display order
    pub const ALL: [Self; 4] = [
        Self::Currency,
        Self::Amount,
        Self::Description,
        Self::ExpiryDate,
    ];

    /// Wire name of the field
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Amount => "amount",
            Self::Description => "description",
            Self::ExpiryDate => "expiryDate",
        }
    }

    /// Human label used when rendering the form
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Currency => "Currency",
            Self::Amount => "Amount",
            Self::Description => "Description",
            Self::ExpiryDate => "Expiry Date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field name that does not match any form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {0}")]
pub struct FieldParseError(pub String);

impl FromStr for Field {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "currency" => Ok(Self::Currency),
            "amount" => Ok(Self::Amount),
            "description" => Ok(Self::Description),
            "expiryDate" | "expiry_date" => Ok(Self::ExpiryDate),
            other => Err(FieldParseError(other.to_string())),
        }
    }
}

/// Raw field values of one form session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    /// Selected currency key
    pub currency: String,
    /// Amount as typed
    pub amount: String,
    /// Description as typed
    pub description: String,
    /// Expiry date as typed (`YYYY-MM-DD`)
    pub expiry_date: String,
}

impl FormValues {
    /// Session defaults: home currency, empty text fields, expiry tomorrow
    #[must_use]
    pub fn defaults(home_currency: &str, today: NaiveDate) -> Self {
        let tomorrow = today.succ_opt().unwrap_or(today);
        Self {
            currency: home_currency.to_string(),
            amount: String::new(),
            description: String::new(),
            expiry_date: tomorrow.format(DATE_FORMAT).to_string(),
        }
    }

    /// Current value of a field
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Currency => &self.currency,
            Field::Amount => &self.amount,
            Field::Description => &self.description,
            Field::ExpiryDate => &self.expiry_date,
        }
    }

    /// Replace the value of a field
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Currency => self.currency = value,
            Field::Amount => self.amount = value,
            Field::Description => self.description = value,
            Field::ExpiryDate => self.expiry_date = value,
        }
    }
}

/// Sparse field → message map; a field is present only while it fails validation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors(BTreeMap<Field, String>);

impl FormErrors {
    /// Empty error set
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Whether no field is failing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for a field, if it is failing
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether a field is failing
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Record a message for a field, replacing any previous one
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drop the message for a field
    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    /// Drop every message
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Failing fields and their messages, in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl FromIterator<(Field, String)> for FormErrors {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A currency known to the directory service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code, unique within the directory
    pub key: String,
    /// Graphical symbol, e.g. `₦`
    pub symbol: String,
    /// Flag emoji
    pub emoji: String,
    /// Display name
    #[serde(rename = "value")]
    pub display_value: String,
}

impl Currency {
    /// Creates a currency entry
    #[must_use]
    pub fn new(key: &str, symbol: &str, emoji: &str, display_value: &str) -> Self {
        Self {
            key: key.to_string(),
            symbol: symbol.to_string(),
            emoji: emoji.to_string(),
            display_value: display_value.to_string(),
        }
    }
}

/// Availability of the currency directory for this session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DirectoryStatus {
    /// Fetch in progress (or not yet started)
    #[default]
    Loading,
    /// Fetched once; never refreshed
    Loaded(Vec<Currency>),
    /// Fetch failed; the form keeps working without it
    Unavailable {
        /// Why the fetch failed
        reason: String,
    },
}

impl DirectoryStatus {
    /// Whether the fetch has not finished yet
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded currencies, if any
    #[must_use]
    pub fn currencies(&self) -> Option<&[Currency]> {
        match self {
            Self::Loaded(currencies) => Some(currencies),
            Self::Loading | Self::Unavailable { .. } => None,
        }
    }

    /// Whether `key` is a known currency; `None` while no directory data exists
    #[must_use]
    pub fn contains(&self, key: &str) -> Option<bool> {
        self.currencies()
            .map(|currencies| currencies.iter().any(|currency| currency.key == key))
    }
}

/// What the confirmation dialog shows after a successful submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkResult {
    /// Generated payment link
    pub link: String,
    /// Values as they were when submitted
    pub values: FormValues,
    /// Whole calendar days from today until the expiry date
    pub expires_in_days: i64,
}

/// Where the session is in its validate → submit → present cycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Editable, nothing in flight
    #[default]
    Idle,
    /// Link generation in flight
    Submitting {
        /// Attempt number the result must carry to be applied
        attempt: u64,
        /// Values captured when submit was called
        values: FormValues,
    },
    /// Link generated; the result dialog is open
    Succeeded(LinkResult),
    /// Link generation failed; the form is editable again
    Failed {
        /// Collaborator error, for logs
        reason: String,
    },
}

impl SubmissionState {
    /// Whether a generation call is in flight
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Generated link, once succeeded
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        match self {
            Self::Succeeded(result) => Some(&result.link),
            Self::Idle | Self::Submitting { .. } | Self::Failed { .. } => None,
        }
    }
}

/// State of one form session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    /// Current field values
    pub values: FormValues,
    /// Fields failing the last validation pass
    pub errors: FormErrors,
    /// Submission lifecycle
    pub submission: SubmissionState,
    /// Currency directory availability
    pub directory: DirectoryStatus,
    /// Currency selected by default
    pub home_currency: String,
    /// Number of submissions started so far
    pub attempts: u64,
    /// Whether the directory fetch has been requested
    pub directory_requested: bool,
}

impl FormState {
    /// Fresh session state with default values
    #[must_use]
    pub fn new(home_currency: impl Into<String>, today: NaiveDate) -> Self {
        let home_currency = home_currency.into();
        Self {
            values: FormValues::defaults(&home_currency, today),
            errors: FormErrors::new(),
            submission: SubmissionState::Idle,
            directory: DirectoryStatus::Loading,
            home_currency,
            attempts: 0,
            directory_requested: false,
        }
    }

    /// Default values for this session as of `today`
    #[must_use]
    pub fn default_values(&self, today: NaiveDate) -> FormValues {
        FormValues::defaults(&self.home_currency, today)
    }
}
