//! Authenticated browser session with auto-waiting interactions.
//!
//! A [`Session`] owns one driver and a shared configuration. Every
//! interaction waits for its element before acting; reads do not wait so an
//! empty list is an observable result rather than a timeout.

use crate::config::SuiteConfig;
use crate::driver::{absolute_upload_path, Driver};
use crate::locator::{Locator, Selector};
use crate::page_object::{PageObject, UrlMatcher};
use crate::result::{E2eError, E2eResult};
use crate::selectors::Selectors;
use crate::wait::{poll_until, WaitOptions};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One browser session bound to the suite configuration
#[derive(Debug)]
pub struct Session<D: Driver> {
    driver: D,
    config: Arc<SuiteConfig>,
}

impl<D: Driver> Session<D> {
    /// Wrap a driver
    #[must_use]
    pub const fn new(driver: D, config: Arc<SuiteConfig>) -> Self {
        Self { driver, config }
    }

    /// Underlying driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Configured selectors
    #[must_use]
    pub fn selectors(&self) -> &Selectors {
        &self.config.selectors
    }

    /// Locator for a selector, carrying the configured wait budget
    #[must_use]
    pub fn locator(&self, selector: &Selector) -> Locator {
        let options = self.config.timeouts.locator_options();
        Locator::from_selector(selector.clone())
            .with_timeout(options.timeout)
            .with_poll_interval(options.poll_interval)
    }

    /// Navigate to an absolute URL
    pub async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!(url, "goto");
        self.driver.goto(url).await
    }

    /// Navigate to a path below the base URL
    pub async fn goto_path(&self, path: &str) -> E2eResult<()> {
        self.goto(&self.config.url(path)).await
    }

    /// Current page URL
    pub async fn current_url(&self) -> E2eResult<String> {
        self.driver.current_url().await
    }

    /// Reload the current page
    pub async fn reload(&self) -> E2eResult<()> {
        debug!("reload");
        self.driver.reload().await
    }

    /// Wait until the locator's first match is visible
    pub async fn wait_visible(&self, locator: &Locator) -> E2eResult<()> {
        let what = format!("{locator} to be visible");
        poll_until(&what, &WaitOptions::from(locator.options()), || {
            self.driver.is_visible(locator)
        })
        .await
        .map(|_| ())
    }

    /// Wait until nothing the locator matches is visible
    pub async fn wait_hidden(&self, locator: &Locator) -> E2eResult<()> {
        let what = format!("{locator} to be hidden");
        poll_until(&what, &WaitOptions::from(locator.options()), || async {
            Ok::<_, E2eError>(!self.driver.is_visible(locator).await?)
        })
        .await
        .map(|_| ())
    }

    /// Wait until the locator matches at least one element, visible or not
    pub async fn wait_attached(&self, locator: &Locator) -> E2eResult<()> {
        let what = format!("{locator} to be attached");
        poll_until(&what, &WaitOptions::from(locator.options()), || async {
            Ok::<_, E2eError>(self.driver.count(locator).await? > 0)
        })
        .await
        .map(|_| ())
    }

    /// Whether the locator becomes visible within `window`
    pub async fn appears_within(&self, locator: &Locator, window: Duration) -> E2eResult<bool> {
        let options = WaitOptions::from(locator.options()).with_timeout(
            u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
        );
        let what = format!("{locator} to appear");
        match poll_until(&what, &options, || self.driver.is_visible(locator)).await {
            Ok(_) => Ok(true),
            Err(E2eError::Timeout { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Click once visible
    pub async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.wait_visible(locator).await?;
        debug!(%locator, "click");
        self.driver.click(locator).await
    }

    /// Replace an input's value once visible
    pub async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.wait_visible(locator).await?;
        debug!(%locator, value, "fill");
        self.driver.fill(locator, value).await
    }

    /// Empty an input once visible
    pub async fn clear(&self, locator: &Locator) -> E2eResult<()> {
        self.wait_visible(locator).await?;
        debug!(%locator, "clear");
        self.driver.clear(locator).await
    }

    /// Text of the first match, once visible
    pub async fn text(&self, locator: &Locator) -> E2eResult<String> {
        self.wait_visible(locator).await?;
        let texts = self.driver.text_contents(locator).await?;
        texts
            .into_iter()
            .next()
            .ok_or_else(|| E2eError::ElementNotFound {
                locator: locator.to_string(),
            })
    }

    /// Text of every match, without waiting
    pub async fn texts(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        self.driver.text_contents(locator).await
    }

    /// Attribute of every match, without waiting
    pub async fn attributes(&self, locator: &Locator, name: &str) -> E2eResult<Vec<String>> {
        self.driver.attribute_values(locator, name).await
    }

    /// Whether the first match is visible right now
    pub async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        self.driver.is_visible(locator).await
    }

    /// Attach a local file to a file input (inputs are usually hidden)
    pub async fn upload(&self, locator: &Locator, file: &Path) -> E2eResult<()> {
        let absolute = absolute_upload_path(file)?;
        self.wait_attached(locator).await?;
        debug!(%locator, file = %absolute.display(), "upload");
        self.driver.set_input_files(locator, &[absolute]).await
    }

    /// Wait until the current URL matches, and return it
    pub async fn wait_for_url(&self, matcher: &UrlMatcher) -> E2eResult<String> {
        let options = WaitOptions::new()
            .with_timeout(self.config.timeouts.navigation_ms)
            .with_poll_interval(self.config.timeouts.poll_ms);
        let what = format!("URL matching {}", matcher.pattern());
        poll_until(&what, &options, || async {
            Ok::<_, E2eError>(matcher.matches(&self.driver.current_url().await?))
        })
        .await?;
        self.current_url().await
    }

    /// Wait until the browser shows `page`, and return the URL
    pub async fn wait_for_page<P: PageObject>(&self, page: &P) -> E2eResult<String> {
        debug!(page = page.page_name(), "waiting for page");
        self.wait_for_url(&UrlMatcher::new(page.url_pattern())).await
    }

    /// Wait for the success toast of a save/delete, then for the spinner to go
    pub async fn wait_saved(&self) -> E2eResult<()> {
        let common = &self.config.selectors.common;
        self.wait_visible(&self.locator(&common.toast_success))
            .await?;
        self.wait_hidden(&self.locator(&common.loading_spinner))
            .await
    }

    /// Submit a form or confirm a dialog and wait until it is saved.
    ///
    /// A success toast still showing from an earlier save is waited out
    /// first, so the toast that ends the wait belongs to this submission.
    pub async fn submit(&self, locator: &Locator) -> E2eResult<()> {
        let toast = self.locator(&self.config.selectors.common.toast_success);
        self.wait_hidden(&toast).await?;
        self.click(locator).await?;
        self.wait_saved().await
    }

    /// Close the browser
    pub async fn close(self) -> E2eResult<()> {
        self.driver.close().await
    }
}

/// Opens isolated sessions for parallel scenario workers
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Driver backing the sessions
    type Driver: Driver + 'static;

    /// Open a new, not yet authenticated session
    async fn open(&self) -> E2eResult<Session<Self::Driver>>;
}
