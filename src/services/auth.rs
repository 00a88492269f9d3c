//! Session authenticator - capability layer
//!
//! Establishes the authenticated browser session. Runs once per run; any
//! timeout here is fatal because no row can be processed without a session.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, AuthError};
use crate::infrastructure::DomExecutor;

const USERNAME_INPUT_ID: &str = "username";
const PASSWORD_INPUT_ID: &str = "password";
const SUBMIT_BUTTON_XPATH: &str = "//button[@type='submit']";

/// Session authenticator
pub struct Authenticator {
    login_url: String,
    home_fragment: String,
    username: String,
    password: String,
    field_wait: Duration,
    login_wait: Duration,
}

impl Authenticator {
    pub fn new(config: &Config) -> Self {
        Self {
            login_url: config.login_url.clone(),
            home_fragment: config.home_fragment.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            field_wait: config.field_wait(),
            login_wait: config.login_wait(),
        }
    }

    /// Drive the two-step login form, then confirm the landing page.
    pub async fn login(&self, executor: &DomExecutor) -> AppResult<()> {
        info!("Attempting login as '{}'...", self.username);
        executor.goto(&self.login_url).await?;

        // Step 1: identity
        let probe = DomExecutor::id_clickable_probe(USERNAME_INPUT_ID);
        if !executor.try_wait(&probe, self.field_wait).await {
            return Err(AppError::auth_step_timed_out(
                "username input",
                self.field_wait.as_secs(),
            ));
        }
        executor
            .set_value_by_id(USERNAME_INPUT_ID, &self.username)
            .await?;
        executor.click_xpath(SUBMIT_BUTTON_XPATH).await?;
        debug!("Username submitted");

        // Step 2: credential
        let probe = DomExecutor::id_clickable_probe(PASSWORD_INPUT_ID);
        if !executor.try_wait(&probe, self.field_wait).await {
            return Err(AppError::auth_step_timed_out(
                "password input",
                self.field_wait.as_secs(),
            ));
        }
        executor
            .set_value_by_id(PASSWORD_INPUT_ID, &self.password)
            .await?;
        executor.click_xpath(SUBMIT_BUTTON_XPATH).await?;
        debug!("Password submitted");

        // Step 3: landing page. Login round-trips are slower, so this wait
        // gets the long timeout.
        let probe = DomExecutor::url_contains_probe(&self.home_fragment);
        if !executor.try_wait(&probe, self.login_wait).await {
            return Err(AppError::Auth(AuthError::HomePageNotReached {
                waited_secs: self.login_wait.as_secs(),
            }));
        }

        info!("Login successful");
        Ok(())
    }
}
