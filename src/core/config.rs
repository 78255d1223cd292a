use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

/// Behaviour of the login application itself
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Artificial latency added to every `/api/auth` response
    #[serde(default)]
    pub response_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_success_timeout_secs")]
    pub success_timeout_secs: u64,
    #[serde(default = "default_error_timeout_secs")]
    pub error_timeout_secs: u64,
}

/// Selectors and texts the scenarios look for on the page
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_login_selector")]
    pub login_selector: String,
    #[serde(default = "default_password_selector")]
    pub password_selector: String,
    #[serde(default = "default_submit_button_text")]
    pub submit_button_text: String,
    #[serde(default = "default_error_notification_text")]
    pub error_notification_text: String,
    #[serde(default = "default_personal_account_text")]
    pub personal_account_text: String,
    #[serde(default = "default_wrong_credentials_text")]
    pub wrong_credentials_text: String,
    #[serde(default = "default_blocked_user_text")]
    pub blocked_user_text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

/// Longest wait a scenario may be configured with
const MAX_TIMEOUT_SECS: u64 = 3600;

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_base_url() -> String {
    "http://localhost:9999".to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_success_timeout_secs() -> u64 {
    4
}

fn default_error_timeout_secs() -> u64 {
    10
}

fn default_login_selector() -> String {
    ".form [data-test-id='login'] .input__box .input__control".to_string()
}

fn default_password_selector() -> String {
    ".form [data-test-id='password'] .input__box .input__control".to_string()
}

fn default_submit_button_text() -> String {
    "Продолжить".to_string()
}

fn default_error_notification_text() -> String {
    "Ошибка".to_string()
}

fn default_personal_account_text() -> String {
    "Личный кабинет".to_string()
}

fn default_wrong_credentials_text() -> String {
    "Неверно указан логин или пароль".to_string()
}

fn default_blocked_user_text() -> String {
    "Пользователь заблокирован".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            success_timeout_secs: default_success_timeout_secs(),
            error_timeout_secs: default_error_timeout_secs(),
        }
    }
}

impl TimeoutConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn success_timeout(&self) -> Duration {
        Duration::from_secs(self.success_timeout_secs)
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_secs(self.error_timeout_secs)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            login_selector: default_login_selector(),
            password_selector: default_password_selector(),
            submit_button_text: default_submit_button_text(),
            error_notification_text: default_error_notification_text(),
            personal_account_text: default_personal_account_text(),
            wrong_credentials_text: default_wrong_credentials_text(),
            blocked_user_text: default_blocked_user_text(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.target.base_url.is_empty() {
            bail!("base_url must not be empty");
        }

        if !self.target.base_url.starts_with("http://") && !self.target.base_url.starts_with("https://") {
            bail!("base_url must start with http:// or https://, got '{}'", self.target.base_url);
        }

        if self.timeouts.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than 0");
        }

        for (name, secs) in [
            ("success_timeout_secs", self.timeouts.success_timeout_secs),
            ("error_timeout_secs", self.timeouts.error_timeout_secs),
        ] {
            if secs > MAX_TIMEOUT_SECS {
                bail!("{} must be at most {} seconds, got {}", name, MAX_TIMEOUT_SECS, secs);
            }
        }

        let poll_interval = self.timeouts.poll_interval();
        if self.timeouts.success_timeout() < poll_interval {
            bail!(
                "success_timeout_secs ({}s) must not be shorter than poll_interval_ms ({}ms)",
                self.timeouts.success_timeout_secs,
                self.timeouts.poll_interval_ms
            );
        }

        if self.timeouts.error_timeout() < poll_interval {
            bail!(
                "error_timeout_secs ({}s) must not be shorter than poll_interval_ms ({}ms)",
                self.timeouts.error_timeout_secs,
                self.timeouts.poll_interval_ms
            );
        }

        let ui_fields = [
            ("login_selector", &self.ui.login_selector),
            ("password_selector", &self.ui.password_selector),
            ("submit_button_text", &self.ui.submit_button_text),
            ("error_notification_text", &self.ui.error_notification_text),
            ("personal_account_text", &self.ui.personal_account_text),
            ("wrong_credentials_text", &self.ui.wrong_credentials_text),
            ("blocked_user_text", &self.ui.blocked_user_text),
        ];
        for (name, value) in ui_fields {
            if value.is_empty() {
                bail!("ui.{} must not be empty", name);
            }
        }

        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
[server]
port = 9999
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_toml(MINIMAL).expect("Failed to parse config");

        assert_eq!(config.server.port, 9999);
        assert!(config.server.num_threads > 0);
        assert_eq!(config.app.response_delay_ms, 0);
        assert_eq!(config.target.base_url, "http://localhost:9999");
        assert_eq!(config.timeouts.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.timeouts.error_timeout(), Duration::from_secs(10));
        assert_eq!(config.ui.submit_button_text, "Продолжить");
        assert_eq!(config.ui.personal_account_text, "Личный кабинет");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_full_config() {
        let content = r#"
[server]
port = 8080
num_threads = 2

[app]
response_delay_ms = 250

[target]
base_url = "http://127.0.0.1:8080"

[timeouts]
poll_interval_ms = 50
success_timeout_secs = 2
error_timeout_secs = 5

[ui]
submit_button_text = "Continue"

[logging]
level = "debug"
format = "console"
"#;
        let config = Config::from_toml(content).expect("Failed to parse config");

        assert_eq!(config.server.num_threads, 2);
        assert_eq!(config.app.response_delay_ms, 250);
        assert_eq!(config.target.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeouts.success_timeout(), Duration::from_secs(2));
        assert_eq!(config.ui.submit_button_text, "Continue");
        assert_eq!(config.ui.error_notification_text, "Ошибка");
        assert_eq!(config.logging.format, "console");
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = Config::from_toml(include_str!("../../config.example.toml"))
            .expect("config.example.toml should be valid");

        assert_eq!(config.server.port, 9999);
        assert_eq!(config.ui.wrong_credentials_text, "Неверно указан логин или пароль");
        assert_eq!(config.ui.blocked_user_text, "Пользователь заблокирован");
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_toml("[server]\nport = 0\n").unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn test_rejects_zero_poll_interval() {
        let content = "[server]\nport = 9999\n[timeouts]\npoll_interval_ms = 0\n";
        let err = Config::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_rejects_timeout_shorter_than_poll_interval() {
        let content = "[server]\nport = 9999\n[timeouts]\npoll_interval_ms = 5000\nsuccess_timeout_secs = 1\n";
        let err = Config::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("success_timeout_secs"));
    }

    #[test]
    fn test_rejects_huge_timeouts() {
        let content = "[server]\nport = 9999\n[timeouts]\nsuccess_timeout_secs = 9223372036854775807\n";
        let err = Config::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("success_timeout_secs must be at most"));

        let content = "[server]\nport = 9999\n[timeouts]\nerror_timeout_secs = 3601\n";
        let err = Config::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("error_timeout_secs"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let content = "[server]\nport = 9999\n[target]\nbase_url = \"localhost:9999\"\n";
        assert!(Config::from_toml(content).is_err());
    }

    #[test]
    fn test_rejects_empty_ui_text() {
        let content = "[server]\nport = 9999\n[ui]\nblocked_user_text = \"\"\n";
        let err = Config::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("blocked_user_text"));
    }

    #[test]
    fn test_rejects_invalid_log_level() {
        let content = "[server]\nport = 9999\n[logging]\nlevel = \"verbose\"\n";
        let err = Config::from_toml(content).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).expect("Failed to load config");
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/auth-testmode.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
