//! Suite runner.
//!
//! Every scenario gets its own session from a [`SessionFactory`]: open,
//! log in, run, close. Up to `jobs` scenarios run at once. Results come
//! back in declaration order whatever order they finished in.

use crate::pages::LoginPage;
use crate::result::{E2eError, FailureKind};
use crate::scenario::ScenarioId;
use crate::session::SessionFactory;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a single scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every assertion held
    Passed,
    /// Setup, an interaction or an assertion failed
    Failed,
    /// Not started because an earlier scenario failed under fail-fast
    Skipped,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Scenario
    pub id: ScenarioId,
    /// Scenario title
    pub title: String,
    /// Outcome
    pub outcome: Outcome,
    /// Error message if failed
    pub error: Option<String>,
    /// Failure class if failed
    pub kind: Option<FailureKind>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl TestResult {
    /// Create a passing test result
    #[must_use]
    pub fn pass(id: ScenarioId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            outcome: Outcome::Passed,
            error: None,
            kind: None,
            duration_ms: 0,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(id: ScenarioId, error: &E2eError) -> Self {
        Self {
            outcome: Outcome::Failed,
            error: Some(error.to_string()),
            kind: Some(error.kind()),
            ..Self::pass(id)
        }
    }

    /// Create a skipped test result
    #[must_use]
    pub fn skip(id: ScenarioId) -> Self {
        Self {
            outcome: Outcome::Skipped,
            ..Self::pass(id)
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Whether the scenario passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Results from running the suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Individual scenario results, in declaration order
    pub results: Vec<TestResult>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl SuiteResults {
    /// Whether every scenario passed (an empty run passes)
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(TestResult::passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(Outcome::Passed)
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(Outcome::Failed)
    }

    /// Count skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(Outcome::Skipped)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == Outcome::Failed)
            .collect()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Runs scenarios against sessions from a factory
#[derive(Debug, Clone)]
pub struct TestHarness {
    /// Stop starting scenarios once one fails
    pub fail_fast: bool,
    /// Concurrent sessions; 0 uses the available parallelism
    pub jobs: usize,
    /// Name shown in reports
    pub suite_name: String,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self {
            fail_fast: false,
            jobs: 1,
            suite_name: "OrangeHRM My Info".to_string(),
        }
    }
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set the number of concurrent sessions
    #[must_use]
    pub const fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Set the suite name
    #[must_use]
    pub fn with_suite_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Concurrency actually used
    #[must_use]
    pub fn effective_jobs(&self) -> usize {
        if self.jobs == 0 {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        } else {
            self.jobs
        }
    }

    /// Run the scenarios, reporting each result to `on_result` as it lands
    pub async fn run<F, C>(
        &self,
        factory: &F,
        scenarios: &[ScenarioId],
        mut on_result: C,
    ) -> SuiteResults
    where
        F: SessionFactory,
        C: FnMut(&TestResult),
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let failed = AtomicBool::new(false);
        let jobs = self.effective_jobs();
        info!(scenarios = scenarios.len(), jobs, "suite started");

        let mut results: Vec<TestResult> = Vec::with_capacity(scenarios.len());
        let mut pending = stream::iter(scenarios.iter().copied())
            .map(|id| {
                let failed = &failed;
                async move {
                    if self.fail_fast && failed.load(Ordering::SeqCst) {
                        return TestResult::skip(id);
                    }
                    let result = run_one(factory, id).await;
                    if !result.passed() {
                        failed.store(true, Ordering::SeqCst);
                    }
                    result
                }
            })
            .buffer_unordered(jobs);

        while let Some(result) = pending.next().await {
            on_result(&result);
            results.push(result);
        }

        results.sort_by_key(|r| r.id);
        let suite = SuiteResults {
            suite_name: self.suite_name.clone(),
            started_at,
            results,
            duration_ms: elapsed_ms(start),
        };
        info!(
            passed = suite.passed_count(),
            failed = suite.failed_count(),
            skipped = suite.skipped_count(),
            "suite finished"
        );
        suite
    }
}

async fn run_one<F: SessionFactory>(factory: &F, id: ScenarioId) -> TestResult {
    let start = Instant::now();
    let session = match factory.open().await {
        Ok(session) => session,
        Err(e) => {
            let e = match e {
                E2eError::Setup { .. } => e,
                other => E2eError::Setup {
                    message: other.to_string(),
                },
            };
            warn!(scenario = id.id(), error = %e, "session could not be opened");
            return TestResult::fail(id, &e).with_duration_ms(elapsed_ms(start));
        }
    };

    let outcome = match LoginPage::new(&session)
        .perform_login(&session.config().credentials)
        .await
    {
        Ok(()) => id.run(&session).await,
        Err(e) => Err(e),
    };

    if let Err(e) = session.close().await {
        warn!(scenario = id.id(), error = %e, "closing session failed");
    }

    let duration_ms = elapsed_ms(start);
    match outcome {
        Ok(()) => {
            info!(scenario = id.id(), duration_ms, "passed");
            TestResult::pass(id).with_duration_ms(duration_ms)
        }
        Err(e) => {
            warn!(scenario = id.id(), error = %e, "failed");
            TestResult::fail(id, &e).with_duration_ms(duration_ms)
        }
    }
}
