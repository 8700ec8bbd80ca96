//! Chromium control over CDP.
//!
//! Element resolution happens in the page: the locator compiles to a
//! JavaScript query, and elements that need native input (click, typing,
//! file upload) are tagged with a one-off `data-hrm-target` attribute so CDP
//! can address them with a plain CSS lookup.

use crate::config::{BrowserOptions, SuiteConfig};
use crate::driver::Driver;
use crate::locator::{js_str, Locator};
use crate::result::{E2eError, E2eResult};
use crate::session::{Session, SessionFactory};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const TARGET_ATTR: &str = "data-hrm-target";

/// Browser driver with a real CDP connection
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handle: tokio::task::JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumDriver {
    /// Launch chromium and open a blank page
    pub async fn launch(options: &BrowserOptions, navigation_timeout: Duration) -> E2eResult<Self> {
        let mut builder =
            CdpConfig::builder().window_size(options.viewport_width, options.viewport_height);

        if !options.headless {
            builder = builder.with_head();
        }

        if !options.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = options.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| E2eError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| E2eError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| E2eError::BrowserLaunch {
                message: e.to_string(),
            })?;

        tracing::debug!(headless = options.headless, "chromium launched");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handle,
            navigation_timeout,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, expr: String) -> E2eResult<T> {
        let result = self
            .page
            .evaluate(expr)
            .await
            .map_err(|e| E2eError::script(e.to_string()))?;
        result
            .into_value()
            .map_err(|e| E2eError::script(e.to_string()))
    }

    /// Tag the first match and hand back a CDP element for it.
    async fn target(&self, locator: &Locator) -> E2eResult<Element> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let found: bool = self
            .eval(format!(
                "(() => {{ const el = {}; if (!el) return false; \
                 el.setAttribute({}, {}); el.scrollIntoView({{block: 'center'}}); return true; }})()",
                locator.to_query(),
                js_str(TARGET_ATTR),
                js_str(&token)
            ))
            .await?;
        if !found {
            return Err(E2eError::ElementNotFound {
                locator: locator.to_string(),
            });
        }
        self.page
            .find_element(format!("[{TARGET_ATTR}='{token}']"))
            .await
            .map_err(|e| interaction(locator, &e))
    }

    async fn clear_value(&self, locator: &Locator) -> E2eResult<()> {
        let found: bool = self
            .eval(format!(
                "(() => {{ const el = {}; if (!el) return false; el.focus(); el.value = ''; \
                 el.dispatchEvent(new Event('input', {{bubbles: true}})); \
                 el.dispatchEvent(new Event('change', {{bubbles: true}})); return true; }})()",
                locator.to_query()
            ))
            .await?;
        if found {
            Ok(())
        } else {
            Err(E2eError::ElementNotFound {
                locator: locator.to_string(),
            })
        }
    }
}

fn interaction(locator: &Locator, err: &impl std::fmt::Display) -> E2eError {
    E2eError::Interaction {
        locator: locator.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        let navigation_error = |message: String| E2eError::Navigation {
            url: url.to_string(),
            message,
        };
        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| navigation_error("navigation timed out".to_string()))?
            .map_err(|e| navigation_error(e.to_string()))?;
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| E2eError::script(e.to_string()))?;
        Ok(url.unwrap_or_default())
    }

    async fn reload(&self) -> E2eResult<()> {
        let url = self.current_url().await?;
        tokio::time::timeout(self.navigation_timeout, self.page.reload())
            .await
            .map_err(|_| E2eError::Navigation {
                url: url.clone(),
                message: "reload timed out".to_string(),
            })?
            .map_err(|e| E2eError::Navigation {
                url,
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        let element = self.target(locator).await?;
        element
            .click()
            .await
            .map_err(|e| interaction(locator, &e))?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.clear_value(locator).await?;
        let element = self.target(locator).await?;
        element
            .click()
            .await
            .map_err(|e| interaction(locator, &e))?
            .type_str(value)
            .await
            .map_err(|e| interaction(locator, &e))?;
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> E2eResult<()> {
        self.clear_value(locator).await
    }

    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        self.eval(format!(
            "({}).map(el => (el.innerText ?? el.textContent ?? '').trim())",
            locator.to_query_all()
        ))
        .await
    }

    async fn attribute_values(&self, locator: &Locator, name: &str) -> E2eResult<Vec<String>> {
        self.eval(format!(
            "({}).map(el => el.getAttribute({}) ?? '')",
            locator.to_query_all(),
            js_str(name)
        ))
        .await
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        self.eval(locator.to_count_query()).await
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; if (!el) return false; \
             const r = el.getBoundingClientRect(); const s = getComputedStyle(el); \
             return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; }})()",
            locator.to_query()
        ))
        .await
    }

    #[allow(clippy::clone_on_copy)]
    async fn set_input_files(&self, locator: &Locator, files: &[PathBuf]) -> E2eResult<()> {
        let element = self.target(locator).await?;
        let params = SetFileInputFilesParams::builder()
            .files(files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>())
            .backend_node_id(element.backend_node_id.clone())
            .build()
            .map_err(|e| interaction(locator, &e))?;
        self.page
            .execute(params)
            .await
            .map_err(|e| interaction(locator, &e))?;
        Ok(())
    }

    async fn close(&self) -> E2eResult<()> {
        let mut browser = self.browser.lock().await;
        let result = browser.close().await;
        self.handle.abort();
        result.map_err(|e| E2eError::BrowserLaunch {
            message: e.to_string(),
        })?;
        Ok(())
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Opens one freshly launched chromium per session
#[derive(Debug, Clone)]
pub struct ChromiumSessionFactory {
    config: Arc<SuiteConfig>,
}

impl ChromiumSessionFactory {
    /// Create a factory for the given configuration
    #[must_use]
    pub const fn new(config: Arc<SuiteConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for ChromiumSessionFactory {
    type Driver = ChromiumDriver;

    async fn open(&self) -> E2eResult<Session<ChromiumDriver>> {
        let driver = ChromiumDriver::launch(
            &self.config.browser,
            Duration::from_millis(self.config.timeouts.navigation_ms),
        )
        .await?;
        Ok(Session::new(driver, Arc::clone(&self.config)))
    }
}
