//! Form session reducer.
//!
//! All decisions about the session live here: field edits, validation,
//! the submission state machine and the handling of collaborator results.
//! Collaborator calls are returned as effects and run by the store.

use crate::directory::CurrencyDirectory;
use crate::generator::LinkGenerator;
use crate::types::{
    Currency, DirectoryStatus, Field, FormState, LinkResult, SubmissionState,
};
use crate::validation;
use paylink_core::environment::Clock;
use paylink_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Actions for the form session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    /// Session opened; requests the currency directory once
    SessionStarted,

    /// User edited a field
    UpdateField {
        /// Edited field
        field: Field,
        /// New raw value
        value: String,
    },

    /// User asked to generate a link
    Submit,

    /// User closed the result dialog
    DismissResult,

    /// Directory fetch succeeded
    CurrenciesLoaded(Vec<Currency>),

    /// Directory fetch failed
    CurrenciesUnavailable {
        /// Why the fetch failed
        reason: String,
    },

    /// Link generator answered for an attempt
    LinkGenerated {
        /// Attempt the link belongs to
        attempt: u64,
        /// Generated link
        link: String,
    },

    /// Link generator failed for an attempt
    GenerationFailed {
        /// Attempt that failed
        attempt: u64,
        /// Collaborator error
        reason: String,
    },
}

/// Environment for the form reducer
#[derive(Clone)]
pub struct FormEnvironment {
    /// Source of "today"
    pub clock: Arc<dyn Clock>,
    /// Currency lookup
    pub directory: Arc<dyn CurrencyDirectory>,
    /// Link generation
    pub generator: Arc<dyn LinkGenerator>,
}

impl FormEnvironment {
    /// Creates a new environment
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        directory: Arc<dyn CurrencyDirectory>,
        generator: Arc<dyn LinkGenerator>,
    ) -> Self {
        Self {
            clock,
            directory,
            generator,
        }
    }
}

/// Reducer for the payment-link form
#[derive(Clone, Debug, Default)]
pub struct FormReducer;

impl FormReducer {
    /// Creates a new form reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn start_session(state: &mut FormState, env: &FormEnvironment) -> SmallVec<[Effect<FormAction>; 4]> {
        if state.directory_requested {
            tracing::debug!("Session already started, directory not refetched");
            return smallvec![Effect::None];
        }

        state.directory_requested = true;
        state.directory = DirectoryStatus::Loading;
        tracing::info!(home_currency = %state.home_currency, "Form session started");

        let fetch = env.directory.fetch_all();
        smallvec![async_effect! {
            match fetch.await {
                Ok(currencies) => Some(FormAction::CurrenciesLoaded(currencies)),
                Err(error) => Some(FormAction::CurrenciesUnavailable {
                    reason: error.to_string(),
                }),
            }
        }]
    }

    fn submit(state: &mut FormState, env: &FormEnvironment) -> SmallVec<[Effect<FormAction>; 4]> {
        if let SubmissionState::Submitting { attempt, .. } = &state.submission {
            tracing::warn!(attempt, "Submit ignored: a link is already being generated");
            return smallvec![Effect::None];
        }

        if let SubmissionState::Succeeded(result) = &state.submission {
            tracing::warn!(link = %result.link, "Submit ignored: the result dialog is still open");
            return smallvec![Effect::None];
        }

        let mut errors = validation::validate(&state.values, env.clock.today());
        if let Some(message) =
            validation::check_currency_supported(&state.values.currency, &state.directory)
        {
            errors.insert(Field::Currency, message);
        }

        if !errors.is_empty() {
            tracing::info!(failing_fields = errors.len(), "Submission rejected by validation");
            state.errors = errors;
            state.submission = SubmissionState::Idle;
            return smallvec![Effect::None];
        }

        state.errors.clear();
        state.attempts += 1;
        let attempt = state.attempts;
        let values = state.values.clone();
        state.submission = SubmissionState::Submitting {
            attempt,
            values: values.clone(),
        };

        tracing::info!(
            attempt,
            currency = %values.currency,
            amount = %values.amount,
            "Generating payment link"
        );

        let generate = env.generator.generate(values);
        smallvec![async_effect! {
            match generate.await {
                Ok(link) => Some(FormAction::LinkGenerated { attempt, link }),
                Err(error) => Some(FormAction::GenerationFailed {
                    attempt,
                    reason: error.to_string(),
                }),
            }
        }]
    }

    fn link_generated(state: &mut FormState, attempt: u64, link: String, env: &FormEnvironment) {
        let SubmissionState::Submitting {
            attempt: current,
            values,
        } = &state.submission
        else {
            tracing::debug!(attempt, "Discarding link: no submission in flight");
            return;
        };

        if *current != attempt {
            tracing::debug!(attempt, current, "Discarding link from a stale attempt");
            return;
        }

        let expires_in_days = validation::parse_expiry_date(&values.expiry_date)
            .map(|expiry| validation::days_until(expiry, env.clock.today()))
            .unwrap_or_default();

        tracing::info!(attempt, link = %link, expires_in_days, "Payment link generated");

        state.submission = SubmissionState::Succeeded(LinkResult {
            link,
            values: values.clone(),
            expires_in_days,
        });
    }

    fn generation_failed(state: &mut FormState, attempt: u64, reason: String) {
        match &state.submission {
            SubmissionState::Submitting { attempt: current, .. } if *current == attempt => {
                tracing::warn!(attempt, reason = %reason, "Payment link generation failed");
                state.submission = SubmissionState::Failed { reason };
            },
            _ => {
                tracing::debug!(attempt, "Discarding failure from a stale attempt");
            },
        }
    }
}

impl Reducer for FormReducer {
    type State = FormState;
    type Action = FormAction;
    type Environment = FormEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FormAction::SessionStarted => Self::start_session(state, env),

            FormAction::UpdateField { field, value } => {
                state.values.set(field, value);
                state.errors.remove(field);
                if matches!(state.submission, SubmissionState::Failed { .. }) {
                    state.submission = SubmissionState::Idle;
                }
                smallvec![Effect::None]
            },

            FormAction::Submit => Self::submit(state, env),

            FormAction::DismissResult => {
                if state.submission.is_submitting() {
                    tracing::info!("In-flight submission abandoned");
                }
                state.values = state.default_values(env.clock.today());
                state.errors.clear();
                state.submission = SubmissionState::Idle;
                smallvec![Effect::None]
            },

            FormAction::CurrenciesLoaded(currencies) => {
                if state.directory.is_loading() {
                    tracing::info!(count = currencies.len(), "Currency directory loaded");
                    state.directory = DirectoryStatus::Loaded(currencies);
                }
                smallvec![Effect::None]
            },

            FormAction::CurrenciesUnavailable { reason } => {
                if state.directory.is_loading() {
                    tracing::warn!(reason = %reason, "Currency directory unavailable");
                    state.directory = DirectoryStatus::Unavailable { reason };
                }
                smallvec![Effect::None]
            },

            FormAction::LinkGenerated { attempt, link } => {
                Self::link_generated(state, attempt, link, env);
                smallvec![Effect::None]
            },

            FormAction::GenerationFailed { attempt, reason } => {
                Self::generation_failed(state, attempt, reason);
                smallvec![Effect::None]
            },
        }
    }
}
