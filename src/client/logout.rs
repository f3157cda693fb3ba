/**
 * Logout Controller
 *
 * Binds the page's logout affordances to session teardown.
 *
 * # State machine
 *
 * ```text
 * Idle --click--> LoggingOut --ok--> Succeeded (redirect to login)
 *                     |
 *                     +--err--> Idle (button restored, alert shown)
 * ```
 *
 * A normal logout asks the auth capability to sign out first and only then
 * wipes the persisted auth artifacts and session storage. The emergency path
 * skips the capability entirely: it wipes all local state, cookies and open
 * dialogs and goes straight to the login page. The remote session may stay
 * alive after an emergency logout.
 */

use crate::client::auth_manager::AuthManager;
use crate::client::page::Page;
use crate::shared::error::{AuthError, SharedError};
use crate::shared::storage::{clear_auth_artifacts, KeyValueStore};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Redirect after a normal logout
pub const LOGOUT_SUCCESS_URL: &str = "/login?logout=success";

/// Redirect after an emergency logout
pub const EMERGENCY_LOGOUT_URL: &str = "/login?emergency=true";

/// Label shown while a logout is in flight
pub const BUSY_LABEL: &str = "Logging out...";

#[derive(Debug, Error)]
pub enum LogoutError {
    #[error("Logout failed: {0}")]
    Auth(#[from] AuthError),
    #[error("Logout failed: {0}")]
    Storage(#[from] SharedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutState {
    Idle,
    LoggingOut,
    Succeeded,
}

/// Outcome of one click on a logout control
#[derive(Debug)]
pub enum LogoutOutcome {
    /// Unknown control, or a logout is already running / done
    Skipped,
    /// The user declined the confirmation prompt
    Cancelled,
    /// Signed out; the page was sent to `redirect`
    LoggedOut { redirect: &'static str },
    /// Sign-out failed; the control was restored
    Failed(LogoutError),
}

/// A control flagged as a logout trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutButton {
    pub id: String,
    pub label: String,
    pub disabled: bool,
    /// Prompt shown before logging out, when the control declares one
    pub confirm_message: Option<String>,
}

impl LogoutButton {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            disabled: false,
            confirm_message: None,
        }
    }

    pub fn with_confirmation(mut self, message: impl Into<String>) -> Self {
        self.confirm_message = Some(message.into());
        self
    }
}

pub struct LogoutController {
    auth: AuthManager,
    local_storage: Arc<dyn KeyValueStore>,
    session_storage: Arc<dyn KeyValueStore>,
    page: Arc<dyn Page>,
    buttons: Mutex<Vec<LogoutButton>>,
    state: Mutex<LogoutState>,
}

impl LogoutController {
    pub fn new(
        auth: AuthManager,
        local_storage: Arc<dyn KeyValueStore>,
        session_storage: Arc<dyn KeyValueStore>,
        page: Arc<dyn Page>,
    ) -> Self {
        Self {
            auth,
            local_storage,
            session_storage,
            page,
            buttons: Mutex::new(Vec::new()),
            state: Mutex::new(LogoutState::Idle),
        }
    }

    /// Register logout controls. Re-binding an id replaces the old control.
    pub fn bind(&self, buttons: impl IntoIterator<Item = LogoutButton>) {
        let mut bound = self.buttons.lock().unwrap_or_else(|e| e.into_inner());
        for button in buttons {
            bound.retain(|b| b.id != button.id);
            bound.push(button);
        }
        tracing::debug!("{} logout control(s) bound", bound.len());
    }

    pub fn state(&self) -> LogoutState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current rendering of a bound control
    pub fn button(&self, id: &str) -> Option<LogoutButton> {
        let bound = self.buttons.lock().unwrap_or_else(|e| e.into_inner());
        bound.iter().find(|b| b.id == id).cloned()
    }

    fn set_state(&self, state: LogoutState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Move Idle -> LoggingOut; false if another logout owns the controller
    fn try_begin(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state != LogoutState::Idle {
            return false;
        }
        *state = LogoutState::LoggingOut;
        true
    }

    fn update_button(&self, id: &str, f: impl FnOnce(&mut LogoutButton)) {
        let mut bound = self.buttons.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(button) = bound.iter_mut().find(|b| b.id == id) {
            f(button);
        }
    }

    /// Handle a click on the control `button_id`
    pub async fn click(&self, button_id: &str) -> LogoutOutcome {
        let Some(original) = self.button(button_id) else {
            tracing::debug!("Ignoring click on unbound logout control '{}'", button_id);
            return LogoutOutcome::Skipped;
        };

        if self.state() != LogoutState::Idle {
            return LogoutOutcome::Skipped;
        }

        if let Some(message) = &original.confirm_message {
            if !self.page.confirm(message) {
                return LogoutOutcome::Cancelled;
            }
        }

        if !self.try_begin() {
            return LogoutOutcome::Skipped;
        }

        self.update_button(button_id, |b| {
            b.label = BUSY_LABEL.to_string();
            b.disabled = true;
        });

        match self.finish_logout().await {
            Ok(()) => {
                self.set_state(LogoutState::Succeeded);
                self.page.replace_location(LOGOUT_SUCCESS_URL);
                tracing::info!("Logout complete");
                LogoutOutcome::LoggedOut {
                    redirect: LOGOUT_SUCCESS_URL,
                }
            }
            Err(e) => {
                tracing::error!("{}", e);
                self.update_button(button_id, |b| {
                    b.label = original.label.clone();
                    b.disabled = original.disabled;
                });
                self.page.alert(&e.to_string());
                self.set_state(LogoutState::Idle);
                LogoutOutcome::Failed(e)
            }
        }
    }

    async fn finish_logout(&self) -> Result<(), LogoutError> {
        self.auth.sign_out().await?;
        clear_auth_artifacts(self.local_storage.as_ref())?;
        self.session_storage.clear()?;
        Ok(())
    }

    /// Wipe all local state without contacting the auth service.
    ///
    /// Every step runs even if an earlier one fails; the first failure is
    /// returned after the redirect.
    pub fn emergency_logout(&self) -> Result<(), LogoutError> {
        tracing::warn!("Emergency logout: clearing local state without remote sign-out");
        self.set_state(LogoutState::LoggingOut);

        let local = self.local_storage.clear();
        let session = self.session_storage.clear();
        self.page.clear_cookies();
        self.page.close_dialogs();

        self.set_state(LogoutState::Succeeded);
        self.page.replace_location(EMERGENCY_LOGOUT_URL);

        local?;
        session?;
        Ok(())
    }
}
