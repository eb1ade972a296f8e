//! Field validation rules.
//!
//! [`validate`] is a pure function of the values and the current date, so the
//! same input always yields the same [`FormErrors`]. Directory membership is
//! checked separately by [`check_currency_supported`] because it depends on
//! data fetched at runtime.

use crate::types::{DATE_FORMAT, DirectoryStatus, Field, FormErrors, FormValues};
use chrono::NaiveDate;

/// Currency left empty
pub const CURRENCY_REQUIRED: &str = "Currency is required";
/// Currency absent from the loaded directory
pub const CURRENCY_NOT_SUPPORTED: &str = "Currency is not supported";
/// Amount left empty
pub const AMOUNT_REQUIRED: &str = "Amount is required";
/// Amount not a number, not finite, or not above zero
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number";
/// Description left empty
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
/// Expiry date left empty
pub const EXPIRY_REQUIRED: &str = "Expiry date is required";
/// Expiry date not in `YYYY-MM-DD` form or not a real calendar date
pub const EXPIRY_INVALID: &str = "Expiry date must be a valid date";
/// Expiry date today or earlier
pub const EXPIRY_NOT_IN_FUTURE: &str = "Expiry date must be in the future";

/// Validate every field against the rules for `today`
///
/// Returns an entry only for failing fields. Whitespace-only values count as
/// empty, and an empty field reports only its "required" message.
#[must_use]
pub fn validate(values: &FormValues, today: NaiveDate) -> FormErrors {
    Field::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(field, values.get(field), today)
                .map(|message| (field, message.to_string()))
        })
        .collect()
}

/// Validate a single field value
#[must_use]
pub fn validate_field(field: Field, value: &str, today: NaiveDate) -> Option<&'static str> {
    let value = value.trim();

    match field {
        Field::Currency if value.is_empty() => Some(CURRENCY_REQUIRED),
        Field::Currency => None,
        Field::Amount if value.is_empty() => Some(AMOUNT_REQUIRED),
        Field::Amount => parse_amount(value).is_none().then_some(AMOUNT_NOT_POSITIVE),
        Field::Description if value.is_empty() => Some(DESCRIPTION_REQUIRED),
        Field::Description => None,
        Field::ExpiryDate if value.is_empty() => Some(EXPIRY_REQUIRED),
        Field::ExpiryDate => match parse_expiry_date(value) {
            None => Some(EXPIRY_INVALID),
            Some(date) if date <= today => Some(EXPIRY_NOT_IN_FUTURE),
            Some(_) => None,
        },
    }
}

/// Parse amount text as a positive finite number
#[must_use]
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

/// Parse an expiry date in `YYYY-MM-DD` form
#[must_use]
pub fn parse_expiry_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Check the selected currency against the directory
///
/// Only a loaded directory can reject a currency; while it is loading or
/// unavailable every non-empty key passes.
#[must_use]
pub fn check_currency_supported(currency: &str, directory: &DirectoryStatus) -> Option<&'static str> {
    let key = currency.trim();
    if key.is_empty() {
        return None;
    }

    match directory.contains(key) {
        Some(false) => Some(CURRENCY_NOT_SUPPORTED),
        Some(true) | None => None,
    }
}

/// Whole calendar days from `today` until `expiry`
#[must_use]
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Currency;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 3, 14)
    }

    fn valid_values() -> FormValues {
        FormValues {
            currency: "NGN".to_string(),
            amount: "100".to_string(),
            description: "invoice".to_string(),
            expiry_date: "2025-03-15".to_string(),
        }
    }

    #[test]
    fn valid_values_have_no_errors() {
        assert!(validate(&valid_values(), today()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_required_message() {
        let errors = validate(&FormValues::default(), today());

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(Field::Currency), Some(CURRENCY_REQUIRED));
        assert_eq!(errors.get(Field::Amount), Some(AMOUNT_REQUIRED));
        assert_eq!(errors.get(Field::Description), Some(DESCRIPTION_REQUIRED));
        assert_eq!(errors.get(Field::ExpiryDate), Some(EXPIRY_REQUIRED));
    }

    #[test]
    fn whitespace_counts_as_empty() {
        let values = FormValues {
            description: "   ".to_string(),
            amount: "\t".to_string(),
            ..valid_values()
        };
        let errors = validate(&values, today());

        assert_eq!(errors.get(Field::Description), Some(DESCRIPTION_REQUIRED));
        assert_eq!(errors.get(Field::Amount), Some(AMOUNT_REQUIRED));
    }

    #[test]
    fn negative_amount_is_the_only_error() {
        let values = FormValues {
            amount: "-5".to_string(),
            ..valid_values()
        };
        let errors = validate(&values, today());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Amount), Some(AMOUNT_NOT_POSITIVE));
    }

    #[test]
    fn amount_rejects_non_numbers_and_non_finite() {
        for text in ["abc", "0", "0.00", "NaN", "inf", "-inf", "1,000"] {
            assert_eq!(parse_amount(text), None, "{text} should be rejected");
        }
        assert_eq!(parse_amount(" 12.5 "), Some(12.5));
        assert_eq!(parse_amount("0.01"), Some(0.01));
    }

    #[test]
    fn expiry_yesterday_is_the_only_error() {
        let values = FormValues {
            expiry_date: "2025-03-13".to_string(),
            ..valid_values()
        };
        let errors = validate(&values, today());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::ExpiryDate), Some(EXPIRY_NOT_IN_FUTURE));
    }

    #[test]
    fn expiry_today_is_not_in_the_future() {
        assert_eq!(
            validate_field(Field::ExpiryDate, "2025-03-14", today()),
            Some(EXPIRY_NOT_IN_FUTURE)
        );
        assert_eq!(validate_field(Field::ExpiryDate, "2025-03-15", today()), None);
    }

    #[test]
    fn malformed_expiry_is_invalid() {
        for text in ["tomorrow", "2025-02-30", "14/03/2026", "2025-3"] {
            assert_eq!(
                validate_field(Field::ExpiryDate, text, today()),
                Some(EXPIRY_INVALID),
                "{text} should be invalid"
            );
        }
    }

    #[test]
    fn currency_checked_only_against_loaded_directory() {
        let loaded = DirectoryStatus::Loaded(vec![Currency::new("NGN", "₦", "", "Naira")]);
        let unavailable = DirectoryStatus::Unavailable {
            reason: "offline".to_string(),
        };

        assert_eq!(check_currency_supported("NGN", &loaded), None);
        assert_eq!(check_currency_supported("XYZ", &loaded), Some(CURRENCY_NOT_SUPPORTED));
        assert_eq!(check_currency_supported("XYZ", &DirectoryStatus::Loading), None);
        assert_eq!(check_currency_supported("XYZ", &unavailable), None);
        assert_eq!(check_currency_supported("", &loaded), None);
    }

    #[test]
    fn days_until_crosses_month_boundary() {
        assert_eq!(days_until(date(2025, 2, 2), date(2025, 1, 31)), 2);
        assert_eq!(days_until(date(2025, 3, 1), date(2024, 2, 28)), 367);
        assert_eq!(days_until(date(2025, 3, 15), date(2025, 3, 14)), 1);
    }

    fn arbitrary_values() -> impl Strategy<Value = FormValues> {
        let text = "[ a-zA-Z0-9.\\-]{0,12}";
        (text, text, text, text).prop_map(|(currency, amount, description, expiry_date)| {
            FormValues {
                currency,
                amount,
                description,
                expiry_date,
            }
        })
    }

    proptest! {
        #[test]
        fn validate_is_idempotent(values in arbitrary_values()) {
            prop_assert_eq!(validate(&values, today()), validate(&values, today()));
        }

        #[test]
        fn blank_fields_get_required_messages_only(
            pad in "[ \t]{0,4}",
            amount in "[1-9][0-9]{0,5}",
        ) {
            let values = FormValues {
                currency: pad.clone(),
                amount,
                description: pad,
                expiry_date: "2025-03-20".to_string(),
            };
            let errors = validate(&values, today());

            prop_assert_eq!(errors.len(), 2);
            prop_assert_eq!(errors.get(Field::Currency), Some(CURRENCY_REQUIRED));
            prop_assert_eq!(errors.get(Field::Description), Some(DESCRIPTION_REQUIRED));
        }

        #[test]
        fn positive_amounts_pass(amount in 0.01f64..1_000_000.0) {
            prop_assert!(validate_field(Field::Amount, &amount.to_string(), today()).is_none());
        }

        #[test]
        fn non_positive_amounts_fail(amount in -1_000_000.0f64..=0.0) {
            prop_assert_eq!(
                validate_field(Field::Amount, &amount.to_string(), today()),
                Some(AMOUNT_NOT_POSITIVE)
            );
        }

        #[test]
        fn future_dates_pass_and_past_dates_fail(offset in 1i64..2_000) {
            let future = today() + chrono::Duration::days(offset);
            let past = today() - chrono::Duration::days(offset);

            prop_assert!(
                validate_field(Field::ExpiryDate, &future.format(DATE_FORMAT).to_string(), today())
                    .is_none()
            );
            prop_assert_eq!(
                validate_field(Field::ExpiryDate, &past.format(DATE_FORMAT).to_string(), today()),
                Some(EXPIRY_NOT_IN_FUTURE)
            );
            prop_assert_eq!(days_until(future, today()), offset);
        }
    }
}
