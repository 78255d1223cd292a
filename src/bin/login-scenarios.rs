//! Run the login scenarios against an already running app (`target.base_url`).

use anyhow::{bail, Context, Result};
use auth_testmode::api::client::HttpUserStore;
use auth_testmode::assertions::login_form::LoginForm;
use auth_testmode::core::config::Config;
use auth_testmode::core::tracing_init::init_tracing;
use auth_testmode::fixtures::registration::UserFactory;
use auth_testmode::models::user::UserStatus;
use auth_testmode::scenario::{Scenario, ScenarioReport};
use auth_testmode::ui::session::FormSession;
use std::env;
use std::path::PathBuf;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = Config::from_file(&config_path)
        .context(format!("Failed to load configuration from '{}'", config_path.display()))?;

    init_tracing(&config.logging)?;

    let base_url = config.target.base_url.clone();
    info!(base_url = %base_url, "Running login scenarios");

    let fixtures = UserFactory::new(HttpUserStore::new(&base_url)?);
    let session = FormSession::new(&base_url, config.ui.clone())?;
    let form = LoginForm::new(session, config.ui.clone(), config.timeouts.poll_interval());

    let ui = &config.ui;
    let success_timeout = config.timeouts.success_timeout();
    let error_timeout = config.timeouts.error_timeout();
    let mut reports: Vec<ScenarioReport> = Vec::new();

    let active = fixtures.register_user(UserStatus::Active).await?;
    reports.push(
        run_on_fresh_page(
            &form,
            Scenario::expect_success("active registered user", success_timeout),
            &active.login,
            &active.password,
        )
        .await?,
    );

    let unregistered = fixtures.build_user(UserStatus::Active);
    reports.push(
        run_on_fresh_page(
            &form,
            Scenario::expect_error("not registered user", &ui.wrong_credentials_text, error_timeout),
            &unregistered.login,
            &unregistered.password,
        )
        .await?,
    );

    let blocked = fixtures.register_user(UserStatus::Blocked).await?;
    reports.push(
        run_on_fresh_page(
            &form,
            Scenario::expect_error("blocked registered user", &ui.blocked_user_text, error_timeout),
            &blocked.login,
            &blocked.password,
        )
        .await?,
    );

    let registered = fixtures.register_user(UserStatus::Active).await?;
    reports.push(
        run_on_fresh_page(
            &form,
            Scenario::expect_error("wrong login", &ui.wrong_credentials_text, error_timeout),
            &fixtures.generate_login(),
            &registered.password,
        )
        .await?,
    );

    reports.push(
        run_on_fresh_page(
            &form,
            Scenario::expect_error("wrong password", &ui.wrong_credentials_text, error_timeout),
            &registered.login,
            &fixtures.generate_password(),
        )
        .await?,
    );

    let failed = reports.iter().filter(|r| !r.passed()).count();
    info!(total = reports.len(), failed, "Login scenarios finished");

    if failed > 0 {
        bail!("{} of {} login scenarios failed", failed, reports.len());
    }

    Ok(())
}

/// Reopen the login page, run one scenario and log where a failure left the page
async fn run_on_fresh_page(
    form: &LoginForm<FormSession>,
    scenario: Scenario,
    login: &str,
    password: &str,
) -> Result<ScenarioReport> {
    form.surface().open().await?;
    let report = scenario.run(form, login, password).await;

    if let Err(e) = &report.result {
        error!(
            scenario = %report.name,
            state = ?report.state(),
            page = ?form.surface().current_page().await,
            surface_failure = ?report.surface_failure,
            error = %e,
            "FAILED"
        );
    }

    Ok(report)
}
