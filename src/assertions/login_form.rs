use crate::assertions::polling::{poll_until, WaitOutcome};
use crate::core::config::UiConfig;
use crate::core::error::{AssertionError, UiError};
use crate::ui::surface::{Locator, UiSurface};
use std::time::Duration;
use tracing::{debug, warn};

/// Drives the login form and waits for its terminal states.
///
/// Holds no page state of its own; every observation is a fresh sample of the surface.
pub struct LoginForm<S> {
    surface: S,
    ui: UiConfig,
    poll_interval: Duration,
}

impl<S: UiSurface> LoginForm<S> {
    pub fn new(surface: S, ui: UiConfig, poll_interval: Duration) -> Self {
        Self {
            surface,
            ui,
            poll_interval,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn ui(&self) -> &UiConfig {
        &self.ui
    }

    pub async fn submit_credentials(&self, login: &str, password: &str) -> Result<(), UiError> {
        self.surface
            .set_field(&Locator::css(&self.ui.login_selector), login)
            .await?;
        self.surface
            .set_field(&Locator::css(&self.ui.password_selector), password)
            .await?;
        self.surface
            .click(&Locator::button(&self.ui.submit_button_text))
            .await?;

        debug!(login = %login, "Credentials submitted");
        Ok(())
    }

    /// Wait for the personal account view; returns how long it took to appear
    pub async fn await_success_state(&self, timeout: Duration) -> Result<Duration, AssertionError> {
        let heading = Locator::exact_text(&self.ui.personal_account_text);

        let surface = &self.surface;
        let target = &heading;
        let outcome = poll_until(timeout, self.poll_interval, move || surface.is_visible(target)).await;

        into_result(outcome, || format!("{} to be visible", heading))
    }

    /// Wait until the error notification and `expected_message` are visible in the same sample
    pub async fn await_error_state(
        &self,
        expected_message: &str,
        timeout: Duration,
    ) -> Result<Duration, AssertionError> {
        let notification = Locator::exact_text(&self.ui.error_notification_text);
        let message = Locator::with_text(expected_message);

        let surface = &self.surface;
        let (title, text) = (&notification, &message);
        let outcome = poll_until(timeout, self.poll_interval, move || async move {
            surface.is_visible(title).await && surface.is_visible(text).await
        })
        .await;

        into_result(outcome, || format!("{} and {} to be visible", notification, message))
    }
}

fn into_result(
    outcome: WaitOutcome,
    condition: impl FnOnce() -> String,
) -> Result<Duration, AssertionError> {
    match outcome {
        WaitOutcome::Found { elapsed } => Ok(elapsed),
        WaitOutcome::TimedOut { elapsed } => {
            let condition = condition();
            warn!(condition = %condition, elapsed = ?elapsed, "Expected UI state not observed");
            Err(AssertionError::Timeout { condition, elapsed })
        }
    }
}
