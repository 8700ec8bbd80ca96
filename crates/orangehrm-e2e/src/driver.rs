//! Driver - abstract browser automation seam
//!
//! Page objects never talk to a browser directly. They go through
//! [`Session`](crate::Session), which goes through a [`Driver`]:
//!
//! ```text
//! ┌──────────────┐    ┌───────────┐    ┌──────────────────────────────┐
//! │ Page Object  │───►│  Session  │───►│ Driver                       │
//! │ (workflow)   │    │ auto-wait │    │  ChromiumDriver (CDP)        │
//! └──────────────┘    └───────────┘    │  MockDriver (unit tests)     │
//!                                      │  in-memory fakes (tests/)    │
//!                                      └──────────────────────────────┘
//! ```
//!
//! Drivers do not wait. A call either acts on the first element the locator
//! resolves to right now or fails with [`E2eError::ElementNotFound`].

use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Abstract driver trait for browser automation
///
/// Methods take `&self` so several page objects can share one session.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigate to URL and wait for the load event
    async fn goto(&self, url: &str) -> E2eResult<()>;

    /// Get current URL
    async fn current_url(&self) -> E2eResult<String>;

    /// Reload page
    async fn reload(&self) -> E2eResult<()>;

    /// Click the first matching element
    async fn click(&self, locator: &Locator) -> E2eResult<()>;

    /// Replace the value of the first matching input
    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()>;

    /// Empty the first matching input
    async fn clear(&self, locator: &Locator) -> E2eResult<()>;

    /// Trimmed text of every matching element, in document order
    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>>;

    /// Attribute value of every matching element (empty when absent)
    async fn attribute_values(&self, locator: &Locator, name: &str) -> E2eResult<Vec<String>>;

    /// Number of matching elements
    async fn count(&self, locator: &Locator) -> E2eResult<usize>;

    /// Whether the first matching element is rendered and visible
    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool>;

    /// Attach files to the first matching `<input type="file">`
    async fn set_input_files(&self, locator: &Locator, files: &[PathBuf]) -> E2eResult<()>;

    /// Close the browser
    async fn close(&self) -> E2eResult<()>;
}

#[derive(Debug, Default)]
struct MockState {
    current_url: String,
    texts: HashMap<String, Vec<String>>,
    attributes: HashMap<(String, String), Vec<String>>,
    hidden: HashSet<String>,
    values: HashMap<String, String>,
    failing: Vec<String>,
    reveals: Vec<(String, String)>,
    call_history: Vec<String>,
}

/// Mock driver for unit testing
///
/// Answers are keyed by the locator's display form
/// (`css=.a >> nth=0 >> css=.b`). Every locator is visible unless hidden.
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: String) -> E2eResult<()> {
        let mut state = self.state();
        state.call_history.push(call.clone());
        if state.failing.iter().any(|prefix| call.starts_with(prefix)) {
            return Err(E2eError::Interaction {
                locator: call,
                message: "mock failure".to_string(),
            });
        }
        let revealed: Vec<String> = state
            .reveals
            .iter()
            .filter(|(prefix, _)| call.starts_with(prefix.as_str()))
            .map(|(_, key)| key.clone())
            .collect();
        for key in revealed {
            let _ = state.hidden.remove(&key);
        }
        Ok(())
    }

    /// Set the texts returned for a locator
    pub fn set_texts(&self, locator: &Locator, texts: &[&str]) {
        let _ = self.state().texts.insert(
            locator.to_string(),
            texts.iter().map(|t| (*t).to_string()).collect(),
        );
    }

    /// Set the attribute values returned for a locator
    pub fn set_attributes(&self, locator: &Locator, name: &str, values: &[&str]) {
        let _ = self.state().attributes.insert(
            (locator.to_string(), name.to_string()),
            values.iter().map(|v| (*v).to_string()).collect(),
        );
    }

    /// Make a locator invisible
    pub fn hide(&self, locator: &Locator) {
        let _ = self.state().hidden.insert(locator.to_string());
    }

    /// Make a locator visible again
    pub fn show(&self, locator: &Locator) {
        let _ = self.state().hidden.remove(&locator.to_string());
    }

    /// Show `locator` once a call whose history entry starts with `prefix`
    /// has been made
    pub fn show_on(&self, prefix: impl Into<String>, locator: &Locator) {
        let key = locator.to_string();
        let mut state = self.state();
        let _ = state.hidden.insert(key.clone());
        state.reveals.push((prefix.into(), key));
    }

    /// Fail every call whose history entry starts with `prefix`
    pub fn fail_on(&self, prefix: impl Into<String>) {
        self.state().failing.push(prefix.into());
    }

    /// Value last filled into a locator
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.state().values.get(&locator.to_string()).cloned()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_history.iter().any(|c| c.starts_with(method))
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.record(format!("goto:{url}"))?;
        self.state().current_url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.state().current_url.clone())
    }

    async fn reload(&self) -> E2eResult<()> {
        self.record("reload".to_string())
    }

    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.record(format!("click:{locator}"))
    }

    async fn fill(&self, locator: &Locator, value: &str) -> E2eResult<()> {
        self.record(format!("fill:{locator}={value}"))?;
        let _ = self
            .state()
            .values
            .insert(locator.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> E2eResult<()> {
        self.record(format!("clear:{locator}"))?;
        let _ = self.state().values.insert(locator.to_string(), String::new());
        Ok(())
    }

    async fn text_contents(&self, locator: &Locator) -> E2eResult<Vec<String>> {
        Ok(self
            .state()
            .texts
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn attribute_values(&self, locator: &Locator, name: &str) -> E2eResult<Vec<String>> {
        Ok(self
            .state()
            .attributes
            .get(&(locator.to_string(), name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        let state = self.state();
        let key = locator.to_string();
        Ok(match state.texts.get(&key) {
            Some(texts) => texts.len(),
            None => usize::from(!state.hidden.contains(&key)),
        })
    }

    async fn is_visible(&self, locator: &Locator) -> E2eResult<bool> {
        Ok(!self.state().hidden.contains(&locator.to_string()))
    }

    async fn set_input_files(&self, locator: &Locator, files: &[PathBuf]) -> E2eResult<()> {
        let names: Vec<_> = files.iter().map(|f| f.display().to_string()).collect();
        self.record(format!("upload:{locator}={}", names.join(",")))
    }

    async fn close(&self) -> E2eResult<()> {
        self.record("close".to_string())
    }
}

/// Absolute form of an upload path; the file must exist.
pub(crate) fn absolute_upload_path(path: &Path) -> E2eResult<PathBuf> {
    std::fs::canonicalize(path).map_err(|e| {
        E2eError::Io(std::io::Error::new(
            e.kind(),
            format!("upload file {}: {e}", path.display()),
        ))
    })
}
