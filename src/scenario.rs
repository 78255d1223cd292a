use crate::assertions::login_form::LoginForm;
use crate::core::error::AssertionError;
use crate::ui::surface::UiSurface;
use std::time::Duration;
use tracing::{error, info};

/// Where a single login scenario stands.
///
/// `Idle → CredentialsSubmitted → Success | ErrorShown | TimedOut`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    Idle,
    CredentialsSubmitted,
    Success,
    ErrorShown,
    TimedOut,
}

impl ScenarioState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScenarioState::Success | ScenarioState::ErrorShown | ScenarioState::TimedOut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Success,
    /// Error notification carrying this message
    Error(String),
}

/// One login outcome to verify
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub expectation: Expectation,
    pub timeout: Duration,
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub name: String,
    /// Every state the scenario went through, starting at `Idle`
    pub path: Vec<ScenarioState>,
    pub result: Result<Duration, AssertionError>,
    /// Transport failure the surface saw while the scenario ran
    pub surface_failure: Option<String>,
}

impl ScenarioReport {
    pub fn state(&self) -> ScenarioState {
        self.path.last().copied().unwrap_or(ScenarioState::Idle)
    }

    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_result(self) -> Result<Duration, AssertionError> {
        self.result
    }
}

impl Scenario {
    pub fn expect_success(name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            expectation: Expectation::Success,
            timeout,
        }
    }

    pub fn expect_error(name: impl Into<String>, message: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            expectation: Expectation::Error(message.into()),
            timeout,
        }
    }

    /// Submit `login`/`password` on `form` and wait for the expected terminal state
    pub async fn run<S: UiSurface>(&self, form: &LoginForm<S>, login: &str, password: &str) -> ScenarioReport {
        let mut path = vec![ScenarioState::Idle];

        if let Err(e) = form.submit_credentials(login, password).await {
            error!(scenario = %self.name, error = %e, "Could not submit credentials");
            return ScenarioReport {
                name: self.name.clone(),
                path,
                result: Err(e.into()),
                surface_failure: None,
            };
        }
        path.push(ScenarioState::CredentialsSubmitted);

        let (result, reached) = match &self.expectation {
            Expectation::Success => (form.await_success_state(self.timeout).await, ScenarioState::Success),
            Expectation::Error(message) => (
                form.await_error_state(message, self.timeout).await,
                ScenarioState::ErrorShown,
            ),
        };

        let mut surface_failure = None;
        match &result {
            Ok(elapsed) => {
                path.push(reached);
                info!(scenario = %self.name, state = ?reached, elapsed = ?elapsed, "Scenario passed");
            }
            Err(e) => {
                if matches!(e, AssertionError::Timeout { .. }) {
                    path.push(ScenarioState::TimedOut);
                }
                surface_failure = form.surface().last_failure().await;
                error!(scenario = %self.name, error = %e, surface_failure = ?surface_failure, "Scenario failed");
            }
        }

        ScenarioReport {
            name: self.name.clone(),
            path,
            result,
            surface_failure,
        }
    }
}
