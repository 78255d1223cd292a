use crate::core::config::UiConfig;
use crate::core::error::UiError;
use crate::models::auth::{AuthRequest, AuthSuccess, ErrorResponse};
use crate::ui::surface::{ElementHandle, ElementKind, Locator, UiSurface};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const LOGIN_HEADING: &str = "Интернет Банк Мечты";
const GENERIC_FAILURE: &str = "Произошла ошибка";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Blank,
    Login,
    Dashboard,
}

#[derive(Debug, Clone)]
struct Notification {
    title: String,
    content: String,
}

struct PageState {
    page: Page,
    elements: Vec<ElementHandle>,
    notification: Option<Notification>,
    fields: HashMap<String, String>,
    /// Transport or decoding error behind the last generic notification
    failure: Option<String>,
    /// Bumped on every navigation or submit; responses for an older generation are dropped
    generation: u64,
}

impl PageState {
    fn blank() -> Self {
        Self {
            page: Page::Blank,
            elements: Vec::new(),
            notification: None,
            fields: HashMap::new(),
            failure: None,
            generation: 0,
        }
    }

    fn login(ui: &UiConfig, generation: u64) -> Self {
        Self {
            page: Page::Login,
            elements: vec![
                ElementHandle::text(LOGIN_HEADING),
                ElementHandle::input(&ui.login_selector),
                ElementHandle::input(&ui.password_selector),
                ElementHandle::button(&ui.submit_button_text),
            ],
            notification: None,
            fields: HashMap::new(),
            failure: None,
            generation,
        }
    }

    fn show_dashboard(&mut self, heading: &str) {
        self.page = Page::Dashboard;
        self.elements = vec![ElementHandle::text(heading)];
        self.notification = None;
        self.fields.clear();
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.notification = Some(Notification {
            title: title.to_string(),
            content: format!("{}! {}", title, message),
        });
    }

    fn visible(&self) -> impl Iterator<Item = ElementHandle> + '_ {
        let notification = self.notification.iter().flat_map(|n| {
            [ElementHandle::text(&n.title), ElementHandle::text(&n.content)]
        });
        self.elements.iter().cloned().chain(notification)
    }

    fn find(&self, locator: &Locator, kind: ElementKind) -> Option<ElementHandle> {
        self.visible().find(|e| e.kind == kind && locator.matches(e))
    }
}

enum AuthOutcome {
    LoggedIn,
    Rejected(String),
    /// The app's answer never arrived or could not be read
    Failed(String),
}

/// Headless stand-in for a browser tab on the login app.
///
/// Submitting the form returns immediately; the page changes only when the
/// app answers, so callers have to poll for the result.
pub struct FormSession {
    client: reqwest::Client,
    base_url: String,
    ui: UiConfig,
    state: Arc<RwLock<PageState>>,
}

impl FormSession {
    pub fn new(base_url: &str, ui: UiConfig) -> Result<Self, UiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| UiError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            ui,
            state: Arc::new(RwLock::new(PageState::blank())),
        })
    }

    /// Drop whatever the session showed and load the login page fresh
    pub async fn open(&self) -> Result<(), UiError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UiError::Request(format!("Failed to open {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(UiError::Request(format!(
                "Opening {} returned status {}",
                url,
                response.status()
            )));
        }

        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = PageState::login(&self.ui, generation);

        debug!(url = %url, "Login page opened");

        Ok(())
    }

    pub async fn current_page(&self) -> Page {
        self.state.read().await.page
    }

    fn spawn_submit(&self, request: AuthRequest, generation: u64) {
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let ui = self.ui.clone();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let login = request.login.clone();
            let outcome = send_auth(&client, &base_url, &request).await;

            let mut state = state.write().await;
            if state.generation != generation {
                debug!(login = %login, "Discarding response for a page that is gone");
                return;
            }

            match outcome {
                AuthOutcome::LoggedIn => {
                    info!(login = %login, "Login succeeded, dashboard shown");
                    state.show_dashboard(&ui.personal_account_text);
                }
                AuthOutcome::Rejected(message) => {
                    info!(login = %login, message = %message, "Login rejected, error notification shown");
                    state.show_error(&ui.error_notification_text, &message);
                }
                AuthOutcome::Failed(reason) => {
                    warn!(login = %login, reason = %reason, "Login request failed, generic notification shown");
                    state.show_error(&ui.error_notification_text, GENERIC_FAILURE);
                    state.failure = Some(reason);
                }
            }
        });
    }
}

async fn send_auth(client: &reqwest::Client, base_url: &str, request: &AuthRequest) -> AuthOutcome {
    let response = match client
        .post(format!("{}/api/auth", base_url))
        .json(request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => return AuthOutcome::Failed(format!("Auth request failed: {}", e)),
    };

    if !response.status().is_success() {
        return match response.json::<ErrorResponse>().await {
            Ok(body) => AuthOutcome::Rejected(body.error),
            Err(e) => AuthOutcome::Failed(format!("Unreadable auth error response: {}", e)),
        };
    }

    let success = match response.json::<AuthSuccess>().await {
        Ok(success) => success,
        Err(e) => return AuthOutcome::Failed(format!("Unreadable auth success response: {}", e)),
    };

    // Follow the redirect the way a browser would
    match client.get(format!("{}{}", base_url, success.redirect)).send().await {
        Ok(page) if page.status().is_success() => AuthOutcome::LoggedIn,
        Ok(page) => AuthOutcome::Failed(format!(
            "Redirect target {} returned status {}",
            success.redirect,
            page.status()
        )),
        Err(e) => AuthOutcome::Failed(format!("Redirect to {} failed: {}", success.redirect, e)),
    }
}

#[async_trait]
impl UiSurface for FormSession {
    async fn set_field(&self, locator: &Locator, value: &str) -> Result<(), UiError> {
        let mut state = self.state.write().await;

        let input = state
            .find(locator, ElementKind::Input)
            .ok_or_else(|| UiError::ElementNotFound(locator.to_string()))?;

        if let Some(selector) = input.selector {
            state.fields.insert(selector, value.to_string());
        }

        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), UiError> {
        let (request, generation) = {
            let mut state = self.state.write().await;

            state
                .find(locator, ElementKind::Button)
                .ok_or_else(|| UiError::ElementNotFound(locator.to_string()))?;

            let field = |selector: &str| state.fields.get(selector).cloned().unwrap_or_default();
            let request = AuthRequest {
                login: field(self.ui.login_selector.as_str()),
                password: field(self.ui.password_selector.as_str()),
            };

            state.notification = None;
            state.failure = None;
            state.generation += 1;
            (request, state.generation)
        };

        debug!(login = %request.login, "Submitting login form");
        self.spawn_submit(request, generation);

        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> bool {
        self.state.read().await.visible().any(|e| locator.matches(&e))
    }

    async fn find_by_text(&self, text: &str) -> Option<ElementHandle> {
        let locator = Locator::exact_text(text);
        self.state.read().await.visible().find(|e| locator.matches(e))
    }

    async fn last_failure(&self) -> Option<String> {
        self.state.read().await.failure.clone()
    }
}

#[cfg(test)]
impl FormSession {
    async fn field_value(&self, selector: &str) -> Option<String> {
        self.state.read().await.fields.get(selector).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::polling::wait_visible;
    use crate::core::config::Config;
    use crate::core::startup::{spawn_app, RunningApp};
    use crate::core::state::AppState;
    use crate::models::user::{User, UserStatus};

    const WAIT: Duration = Duration::from_secs(5);
    const INTERVAL: Duration = Duration::from_millis(20);

    async fn app_with_delay(delay_ms: u64, users: &[User]) -> (RunningApp, UiConfig) {
        let config = Config::from_toml(&format!(
            "[server]\nport = 9999\n[app]\nresponse_delay_ms = {}\n",
            delay_ms
        ))
        .unwrap();
        let ui = config.ui.clone();
        let state = AppState::new(config);
        for user in users {
            state.users.insert(user.clone()).unwrap();
        }
        (spawn_app(state, "127.0.0.1:0").await.unwrap(), ui)
    }

    #[tokio::test]
    async fn test_blank_session_has_no_fields() {
        let session = FormSession::new("http://127.0.0.1:1", UiConfig::default()).unwrap();

        let err = session
            .set_field(&Locator::css(UiConfig::default().login_selector), "vasya")
            .await
            .unwrap_err();

        assert!(matches!(err, UiError::ElementNotFound(_)));
        assert_eq!(session.current_page().await, Page::Blank);
    }

    #[tokio::test]
    async fn test_open_shows_login_form() {
        let (app, ui) = app_with_delay(0, &[]).await;
        let session = FormSession::new(&app.base_url(), ui.clone()).unwrap();

        session.open().await.unwrap();

        assert_eq!(session.current_page().await, Page::Login);
        assert!(session.is_visible(&Locator::css(&ui.login_selector)).await);
        assert!(session.is_visible(&Locator::button(&ui.submit_button_text)).await);
        assert!(session.find_by_text(LOGIN_HEADING).await.is_some());
    }

    #[tokio::test]
    async fn test_set_field_records_value() {
        let (app, ui) = app_with_delay(0, &[]).await;
        let session = FormSession::new(&app.base_url(), ui.clone()).unwrap();
        session.open().await.unwrap();

        session.set_field(&Locator::css(&ui.login_selector), "vasya").await.unwrap();

        assert_eq!(session.field_value(&ui.login_selector).await.as_deref(), Some("vasya"));
    }

    #[tokio::test]
    async fn test_unknown_button_not_found() {
        let (app, ui) = app_with_delay(0, &[]).await;
        let session = FormSession::new(&app.base_url(), ui).unwrap();
        session.open().await.unwrap();

        let err = session.click(&Locator::button("Зарегистрироваться")).await.unwrap_err();
        assert!(matches!(err, UiError::ElementNotFound(_)));
    }

    #[tokio::test]
    async fn test_successful_submit_lands_on_dashboard_after_response() {
        let (app, ui) = app_with_delay(300, &[User::new("vasya", "qwerty", UserStatus::Active)]).await;
        let session = FormSession::new(&app.base_url(), ui.clone()).unwrap();
        session.open().await.unwrap();

        session.set_field(&Locator::css(&ui.login_selector), "vasya").await.unwrap();
        session.set_field(&Locator::css(&ui.password_selector), "qwerty").await.unwrap();
        session.click(&Locator::button(&ui.submit_button_text)).await.unwrap();

        // The click does not wait for the app
        let heading = Locator::exact_text(&ui.personal_account_text);
        assert!(!session.is_visible(&heading).await);

        assert!(wait_visible(&session, &heading, WAIT, INTERVAL).await);
        assert_eq!(session.current_page().await, Page::Dashboard);
    }

    #[tokio::test]
    async fn test_rejected_submit_shows_notification() {
        let (app, ui) = app_with_delay(0, &[]).await;
        let session = FormSession::new(&app.base_url(), ui.clone()).unwrap();
        session.open().await.unwrap();

        session.set_field(&Locator::css(&ui.login_selector), "ghost").await.unwrap();
        session.set_field(&Locator::css(&ui.password_selector), "nothing").await.unwrap();
        session.click(&Locator::button(&ui.submit_button_text)).await.unwrap();

        let message = Locator::with_text(&ui.wrong_credentials_text);
        assert!(wait_visible(&session, &message, WAIT, INTERVAL).await);
        assert!(session.find_by_text(&ui.error_notification_text).await.is_some());
        assert_eq!(session.current_page().await, Page::Login);
    }

    #[tokio::test]
    async fn test_unreachable_app_records_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let ui = UiConfig::default();
        let session = FormSession::new(&format!("http://{}", addr), ui.clone()).unwrap();
        *session.state.write().await = PageState::login(&ui, 1);

        session.click(&Locator::button(&ui.submit_button_text)).await.unwrap();

        let generic = Locator::with_text(GENERIC_FAILURE);
        assert!(wait_visible(&session, &generic, WAIT, INTERVAL).await);
        let failure = session.last_failure().await.expect("failure should be recorded");
        assert!(failure.contains("Auth request failed"));
    }

    #[tokio::test]
    async fn test_rejection_records_no_failure() {
        let (app, ui) = app_with_delay(0, &[]).await;
        let session = FormSession::new(&app.base_url(), ui.clone()).unwrap();
        session.open().await.unwrap();

        session.click(&Locator::button(&ui.submit_button_text)).await.unwrap();

        let message = Locator::with_text(&ui.wrong_credentials_text);
        assert!(wait_visible(&session, &message, WAIT, INTERVAL).await);
        assert!(session.last_failure().await.is_none());
    }

    #[tokio::test]
    async fn test_reopening_discards_pending_response() {
        let (app, ui) = app_with_delay(300, &[]).await;
        let session = FormSession::new(&app.base_url(), ui.clone()).unwrap();
        session.open().await.unwrap();

        session.click(&Locator::button(&ui.submit_button_text)).await.unwrap();
        session.open().await.unwrap();

        let notification = Locator::exact_text(&ui.error_notification_text);
        assert!(!wait_visible(&session, &notification, Duration::from_millis(600), INTERVAL).await);
    }
}
