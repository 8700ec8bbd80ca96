//! Result and error types for the suite.

use thiserror::Error;

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while driving or verifying the application
#[derive(Debug, Error)]
pub enum E2eError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched a locator
    #[error("No element matches {locator}")]
    ElementNotFound {
        /// Locator description
        locator: String,
    },

    /// Click/fill/upload failed on a matched element
    #[error("Interaction with {locator} failed: {message}")]
    Interaction {
        /// Locator description
        locator: String,
        /// Error message
        message: String,
    },

    /// In-page script evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was awaited
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Caller supplied input the workflow cannot accept
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message
        message: String,
    },

    /// Session setup (login) failed
    #[error("Setup failed: {message}")]
    Setup {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Failure class used when reporting a scenario outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The observable result did not match the expectation
    Assertion,
    /// A UI element was absent or not interactable
    Interaction,
    /// The session could not be established
    Setup,
}

impl E2eError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a script error
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Classify this error for reporting
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::AssertionFailed { .. } => FailureKind::Assertion,
            Self::BrowserLaunch { .. } | Self::Setup { .. } | Self::Config { .. } => {
                FailureKind::Setup
            }
            _ => FailureKind::Interaction,
        }
    }
}
