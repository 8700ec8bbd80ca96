//! Suite configuration.
//!
//! Loaded from `hrm-e2e.yaml` (every section optional), then overridden from
//! the environment:
//!
//! | variable | field |
//! |---|---|
//! | `HRM_BASE_URL` | `base_url` |
//! | `HRM_USERNAME` | `credentials.username` |
//! | `HRM_PASSWORD` | `credentials.password` |
//! | `HRM_SAMPLE_UPLOAD` | `test_data.sample_upload` |
//! | `CHROMIUM_PATH` | `browser.chromium_path` |

use crate::locator::{LocatorOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::pages::Relationship;
use crate::result::{E2eError, E2eResult};
use crate::selectors::Selectors;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "hrm-e2e.yaml";

/// Default application under test
pub const DEFAULT_BASE_URL: &str = "https://yakshahrm.makemylabs.in/orangehrm-5.7";

const REDACTED: &str = "********";

/// Login credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "Admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Fixture data shared by the scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestData {
    /// Relationship label used when a scenario does not choose one
    pub default_relationship: String,
    /// Text entered in "Please Specify" for relationship Other
    pub other_specify: String,
    /// Option picked from the Membership select; 0 is the "-- Select --" placeholder
    pub membership_option_index: usize,
    /// File uploaded by the attachment workflows
    pub sample_upload: PathBuf,
}

impl Default for TestData {
    fn default() -> Self {
        Self {
            default_relationship: "Child".to_string(),
            other_specify: "Foster".to_string(),
            membership_option_index: 1,
            sample_upload: PathBuf::from("sample_upload.pdf"),
        }
    }
}

impl TestData {
    /// Resolve `default_relationship` into a [`Relationship`]
    pub fn default_relationship(&self) -> E2eResult<Relationship> {
        Relationship::from_label(&self.default_relationship, &self.other_specify)
    }
}

/// Browser launch options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Path to the chromium binary (auto-detected when unset)
    pub chromium_path: Option<String>,
    /// Window width
    pub viewport_width: u32,
    /// Window height
    pub viewport_height: u32,
    /// Chromium sandbox (disable in containers)
    pub sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chromium_path: None,
            viewport_width: 1366,
            viewport_height: 768,
            sandbox: true,
        }
    }
}

/// Wait budgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// How long an interaction waits for its element
    pub action_ms: u64,
    /// Polling interval while waiting
    pub poll_ms: u64,
    /// How long a navigation may take
    pub navigation_ms: u64,
    /// How long to watch for an element that may legitimately never appear
    pub settle_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: DEFAULT_TIMEOUT_MS,
            poll_ms: DEFAULT_POLL_INTERVAL_MS,
            navigation_ms: 30_000,
            settle_ms: 1_500,
        }
    }
}

impl Timeouts {
    /// Locator options derived from these budgets
    #[must_use]
    pub const fn locator_options(&self) -> LocatorOptions {
        LocatorOptions {
            timeout: Duration::from_millis(self.action_ms),
            poll_interval: Duration::from_millis(self.poll_ms),
        }
    }
}

/// Complete suite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Base URL of the OrangeHRM installation
    pub base_url: String,
    /// Login credentials
    pub credentials: Credentials,
    /// Fixture data
    pub test_data: TestData,
    /// Browser options
    pub browser: BrowserOptions,
    /// Wait budgets
    pub timeouts: Timeouts,
    /// Selector overrides
    pub selectors: Selectors,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            test_data: TestData::default(),
            browser: BrowserOptions::default(),
            timeouts: Timeouts::default(),
            selectors: Selectors::default(),
        }
    }
}

impl SuiteConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> E2eResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file
    pub fn load(path: &Path) -> E2eResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            E2eError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `path` must exist. Without one, `hrm-e2e.yaml` in the
    /// working directory is used when present. Environment overrides are
    /// applied last and the result is validated.
    pub fn resolve(path: Option<&Path>) -> E2eResult<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => {
                let default = Path::new(CONFIG_FILE_NAME);
                if default.exists() {
                    Self::load(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("HRM_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = get("HRM_USERNAME") {
            self.credentials.username = v;
        }
        if let Some(v) = get("HRM_PASSWORD") {
            self.credentials.password = v;
        }
        if let Some(v) = get("HRM_SAMPLE_UPLOAD") {
            self.test_data.sample_upload = PathBuf::from(v);
        }
        if let Some(v) = get("CHROMIUM_PATH") {
            self.browser.chromium_path = Some(v);
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> E2eResult<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(E2eError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.credentials.username.trim().is_empty() {
            return Err(E2eError::config("credentials.username is empty"));
        }
        if self.credentials.password.is_empty() {
            return Err(E2eError::config("credentials.password is empty"));
        }
        if self.timeouts.action_ms == 0 || self.timeouts.poll_ms == 0 || self.timeouts.settle_ms == 0 {
            return Err(E2eError::config("timeouts must be greater than zero"));
        }
        if self.timeouts.poll_ms > self.timeouts.action_ms {
            return Err(E2eError::config(
                "timeouts.poll_ms must not exceed timeouts.action_ms",
            ));
        }
        let _ = self.test_data.default_relationship()?;
        Ok(())
    }

    /// Absolute URL for a path below the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Copy with the password masked, for display
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.credentials.password = REDACTED.to_string();
        copy
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> E2eResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}
