//! Login screen.

use crate::config::Credentials;
use crate::driver::Driver;
use crate::page_object::PageObject;
use crate::result::{E2eError, E2eResult};
use crate::session::Session;
use tracing::{info, warn};

/// OrangeHRM login form
#[derive(Debug)]
pub struct LoginPage<'a, D: Driver> {
    session: &'a Session<D>,
}

impl<D: Driver> PageObject for LoginPage<'_, D> {
    fn url_pattern(&self) -> &str {
        "/**/auth/login"
    }
}

impl<'a, D: Driver> LoginPage<'a, D> {
    /// Page object over a fresh session
    #[must_use]
    pub const fn new(session: &'a Session<D>) -> Self {
        Self { session }
    }

    /// Sign in and wait for the dashboard shell.
    ///
    /// Any failure here is reported as [`E2eError::Setup`] so the runner can
    /// tell a broken environment from a failing scenario.
    pub async fn perform_login(&self, credentials: &Credentials) -> E2eResult<()> {
        info!(username = %credentials.username, "logging in");
        self.login(credentials).await.map_err(|e| {
            warn!(error = %e, "login failed");
            match e {
                E2eError::Setup { .. } => e,
                other => E2eError::Setup {
                    message: format!("login as '{}' failed: {other}", credentials.username),
                },
            }
        })
    }

    async fn login(&self, credentials: &Credentials) -> E2eResult<()> {
        let s = self.session;
        let selectors = &s.selectors().login;
        s.goto(&s.config().base_url).await?;
        s.fill(&s.locator(&selectors.username), &credentials.username)
            .await?;
        s.fill(&s.locator(&selectors.password), &credentials.password)
            .await?;
        s.click(&s.locator(&selectors.submit)).await?;
        s.wait_visible(&s.locator(&selectors.landed)).await
    }
}
