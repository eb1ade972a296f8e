//! Form session facade.
//!
//! [`FormSession`] hosts the [`FormReducer`] in a [`Store`] and exposes the
//! operations a front end needs. Collaborator failures never surface here;
//! they show up as state.

use crate::reducer::{FormAction, FormEnvironment, FormReducer};
use crate::types::{DirectoryStatus, Field, FieldParseError, FormErrors, FormState, FormValues, SubmissionState};
use crate::validation;
use paylink_core::environment::Clock;
use paylink_runtime::{EffectHandle, Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

/// Store hosting one form session
pub type FormStore = Store<FormState, FormAction, FormEnvironment, FormReducer>;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// Field name not recognised
    #[error(transparent)]
    UnknownField(#[from] FieldParseError),

    /// Session was ended
    #[error("Form session has ended")]
    Closed,
}

impl From<StoreError> for SessionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Closed => Self::Closed,
        }
    }
}

/// One in-memory payment-link form session
#[derive(Clone)]
pub struct FormSession {
    store: FormStore,
    clock: Arc<dyn Clock>,
}

impl FormSession {
    /// Open a session with default values and start fetching the directory
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the store rejects the start action.
    pub async fn start(home_currency: impl Into<String>, env: FormEnvironment) -> Result<Self, SessionError> {
        let clock = Arc::clone(&env.clock);
        let state = FormState::new(home_currency, clock.today());
        let store = Store::new(state, FormReducer::new(), env);

        store.send(FormAction::SessionStarted).await?;

        Ok(Self { store, clock })
    }

    /// Replace a field value and clear its error
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after [`FormSession::end`].
    pub async fn update_field(&self, field: Field, value: impl Into<String>) -> Result<(), SessionError> {
        self.store
            .send(FormAction::UpdateField {
                field,
                value: value.into(),
            })
            .await?;
        Ok(())
    }

    /// Replace a field value addressed by name (`expiryDate` or `expiry_date`)
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownField`] for an unrecognised name and
    /// [`SessionError::Closed`] after [`FormSession::end`].
    pub async fn update_field_by_name(&self, name: &str, value: impl Into<String>) -> Result<(), SessionError> {
        let field = name.parse::<Field>()?;
        self.update_field(field, value).await
    }

    /// Validate the current values as of today without touching state
    pub async fn validate(&self) -> FormErrors {
        let values = self.values().await;
        validation::validate(&values, self.clock.today())
    }

    /// Validate and, when clean, request a link
    ///
    /// The returned handle completes once the generator has answered and its
    /// result has been applied. It completes immediately when validation
    /// fails, a submission is already in flight or a result is still shown.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after [`FormSession::end`].
    pub async fn submit(&self) -> Result<EffectHandle, SessionError> {
        Ok(self.store.send(FormAction::Submit).await?)
    }

    /// Close the result dialog and reset the form to its defaults
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] after [`FormSession::end`].
    pub async fn dismiss_result(&self) -> Result<(), SessionError> {
        self.store.send(FormAction::DismissResult).await?;
        Ok(())
    }

    /// Copy of the whole session state
    pub async fn snapshot(&self) -> FormState {
        self.store.state(FormState::clone).await
    }

    /// Current field values
    pub async fn values(&self) -> FormValues {
        self.store.state(|s| s.values.clone()).await
    }

    /// Current validation errors
    pub async fn errors(&self) -> FormErrors {
        self.store.state(|s| s.errors.clone()).await
    }

    /// Current submission state
    pub async fn submission(&self) -> SubmissionState {
        self.store.state(|s| s.submission.clone()).await
    }

    /// Current directory status
    pub async fn directory(&self) -> DirectoryStatus {
        self.store.state(|s| s.directory.clone()).await
    }

    /// Observe collaborator results as they are applied
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FormAction> {
        self.store.subscribe_actions()
    }

    /// Wait until the directory fetch has settled, up to `timeout`
    ///
    /// Returns the status at that point, which is still
    /// [`DirectoryStatus::Loading`] if the timeout elapsed first.
    pub async fn directory_ready(&self, timeout: Duration) -> DirectoryStatus {
        let mut rx = self.subscribe();

        let status = self.directory().await;
        if !status.is_loading() {
            return status;
        }

        let settled = tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(FormAction::CurrenciesLoaded(_) | FormAction::CurrenciesUnavailable { .. })
                    | Err(broadcast::error::RecvError::Closed) => break,
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {},
                }
            }
        })
        .await;

        if settled.is_err() {
            tracing::debug!(?timeout, "Currency directory still loading");
        }

        self.directory().await
    }

    /// End the session; late collaborator results are dropped
    pub fn end(&self) {
        tracing::info!("Form session ended");
        self.store.close();
    }

    /// Whether [`FormSession::end`] has been called
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.store.is_closed()
    }
}

impl std::fmt::Debug for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("ended", &self.is_ended())
            .finish_non_exhaustive()
    }
}
