//! Text presentation of a form session.
//!
//! These helpers derive everything a front end shows from [`FormState`], so
//! any renderer (the bundled CLI included) stays free of form logic.

use crate::types::{DATE_FORMAT, DirectoryStatus, Field, FormState, LinkResult, SubmissionState};
use chrono::NaiveDate;
use std::fmt::Write as _;

/// Shown in place of any generator error
pub const GENERATION_FAILED: &str = "Could not generate a link. Please try again.";

/// Placeholder for the currency selector
#[must_use]
pub const fn currency_placeholder(directory: &DirectoryStatus) -> &'static str {
    match directory {
        DirectoryStatus::Loading => "Loading currencies...",
        DirectoryStatus::Loaded(_) => "Select currency",
        DirectoryStatus::Unavailable { .. } => "Currencies unavailable",
    }
}

/// Selectable currency keys, empty until the directory has loaded
#[must_use]
pub fn currency_options(directory: &DirectoryStatus) -> Vec<&str> {
    directory
        .currencies()
        .map(|currencies| currencies.iter().map(|c| c.key.as_str()).collect())
        .unwrap_or_default()
}

/// Label of the submit button
#[must_use]
pub const fn submit_label(submission: &SubmissionState) -> &'static str {
    if submission.is_submitting() {
        "Generating..."
    } else {
        "Generate"
    }
}

/// Whether the submit button accepts clicks
#[must_use]
pub const fn submit_enabled(submission: &SubmissionState) -> bool {
    !submission.is_submitting()
}

/// Earliest date the expiry picker offers
#[must_use]
pub fn min_expiry_date(today: NaiveDate) -> String {
    today.succ_opt().unwrap_or(today).format(DATE_FORMAT).to_string()
}

/// Expiry sentence of the result dialog
#[must_use]
pub fn expiry_notice(days: i64) -> String {
    if days == 1 {
        "This link expires in 1 day".to_string()
    } else {
        format!("This link expires in {days} days")
    }
}

/// Banner shown after a failed generation, if any
#[must_use]
pub const fn failure_message(submission: &SubmissionState) -> Option<&'static str> {
    match submission {
        SubmissionState::Failed { .. } => Some(GENERATION_FAILED),
        SubmissionState::Idle | SubmissionState::Submitting { .. } | SubmissionState::Succeeded(_) => None,
    }
}

/// Body of the result dialog
#[must_use]
pub fn result_dialog(result: &LinkResult) -> String {
    let values = &result.values;
    format!(
        "Payment link: {}\n{} {} for \"{}\"\n{}",
        result.link,
        values.amount.trim(),
        values.currency,
        values.description.trim(),
        expiry_notice(result.expires_in_days)
    )
}

/// Render the whole form as plain text
#[must_use]
pub fn render(state: &FormState) -> String {
    if let SubmissionState::Succeeded(result) = &state.submission {
        return result_dialog(result);
    }

    let mut out = String::new();

    for field in Field::ALL {
        let value = state.values.get(field);
        let shown = if field == Field::Currency && value.is_empty() {
            currency_placeholder(&state.directory)
        } else {
            value
        };
        let _ = writeln!(out, "{:<12} {shown}", format!("{}:", field.label()));
        if let Some(message) = state.errors.get(field) {
            let _ = writeln!(out, "{:<12} ! {message}", "");
        }
    }

    let options = currency_options(&state.directory);
    if options.is_empty() {
        let _ = writeln!(out, "Currencies:  {}", currency_placeholder(&state.directory));
    } else {
        let _ = writeln!(out, "Currencies:  {}", options.join(", "));
    }

    if let Some(message) = failure_message(&state.submission) {
        let _ = writeln!(out, "{message}");
    }

    let enabled = if submit_enabled(&state.submission) { "" } else { " (disabled)" };
    let _ = write!(out, "[{}]{enabled}", submit_label(&state.submission));

    out
}
