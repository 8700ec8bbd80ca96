//! orangehrm-e2e: end-to-end suite for OrangeHRM's My Info section
//!
//! Page objects drive a browser through My Info workflows (profile edits,
//! dependents, memberships, immigration records, attachments) and return
//! what the UI shows afterwards. Scenarios assert on those results.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  orangehrm-e2e Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Page       │    │ Session    │            │
//! │   │ (asserts)  │───►│ Objects    │───►│ auto-wait  │──► Driver  │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         ▲                                                        │
//! │   ┌────────────┐   one session per scenario, `jobs` at a time    │
//! │   │ TestHarness│◄── SessionFactory (chromium or in-memory)       │
//! │   └────────────┘                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use orangehrm_e2e::{MockDriver, MyInfoPage, Session, SuiteConfig};
//! use std::sync::Arc;
//!
//! # async fn demo() -> orangehrm_e2e::E2eResult<()> {
//! let session = Session::new(MockDriver::new(), Arc::new(SuiteConfig::default()));
//! let amounts = MyInfoPage::new(&session).add_membership("123456").await?;
//! orangehrm_e2e::assertion::assert_contains(&amounts, "123456.00")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![allow(clippy::missing_errors_doc, clippy::doc_markdown)]

/// Assertions over observable results
pub mod assertion;

/// Page objects
pub mod pages;

/// Per-run unique test values
pub mod unique;

#[cfg(feature = "browser")]
mod browser;
mod config;
mod driver;
mod harness;
#[allow(clippy::must_use_candidate)]
mod locator;
mod page_object;
mod result;
mod scenario;
mod selectors;
mod session;
mod wait;

#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumSessionFactory};
pub use config::{
    BrowserOptions, Credentials, SuiteConfig, TestData, Timeouts, CONFIG_FILE_NAME,
    DEFAULT_BASE_URL,
};
pub use driver::{Driver, MockDriver};
pub use harness::{Outcome, SuiteResults, TestHarness, TestResult};
pub use locator::{
    Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use page_object::{PageObject, UrlMatcher};
pub use pages::{
    AttachmentPanel, DependentsPage, Dropdown, LoginPage, MyInfoPage, RecordTable, Relationship,
};
pub use result::{E2eError, E2eResult, FailureKind};
pub use scenario::ScenarioId;
pub use selectors::{
    AttachmentSelectors, CommonSelectors, DependentSelectors, ImmigrationSelectors,
    LoginSelectors, MembershipSelectors, MyInfoSelectors, RecordTableSelectors, Selectors,
};
pub use session::{Session, SessionFactory};
pub use wait::{poll_until, WaitOptions, WaitResult};
