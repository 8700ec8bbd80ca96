//! Scenario selection and suite execution

use crate::commands::RunArgs;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use orangehrm_e2e::{ScenarioId, SessionFactory, SuiteResults, TestHarness};
use tracing::info;

/// Scenarios matching `filter`, in declaration order.
///
/// A filter that matches nothing is an error so a typo never reports an
/// empty, green run.
pub fn select_scenarios(filter: Option<&str>) -> CliResult<Vec<ScenarioId>> {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(ScenarioId::all());
    };
    let selected: Vec<ScenarioId> = ScenarioId::ALL
        .iter()
        .copied()
        .filter(|s| s.matches(filter))
        .collect();
    if selected.is_empty() {
        Err(CliError::invalid_argument(format!(
            "no scenario matches '{filter}' (see `hrm-e2e list`)"
        )))
    } else {
        Ok(selected)
    }
}

/// Runs selected scenarios through a session factory
#[derive(Debug)]
pub struct SuiteRunner {
    harness: TestHarness,
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Runner configured from `run` arguments
    #[must_use]
    pub fn new(args: &RunArgs, reporter: ProgressReporter) -> Self {
        let mut harness = TestHarness::new().with_jobs(args.jobs);
        if args.fail_fast {
            harness = harness.with_fail_fast();
        }
        Self { harness, reporter }
    }

    /// Get the reporter
    #[must_use]
    pub const fn reporter(&self) -> &ProgressReporter {
        &self.reporter
    }

    /// Run `scenarios`, reporting each as it finishes
    pub async fn run<F: SessionFactory>(
        &mut self,
        factory: &F,
        scenarios: &[ScenarioId],
    ) -> SuiteResults {
        info!(
            scenarios = scenarios.len(),
            jobs = self.harness.effective_jobs(),
            "starting run"
        );
        self.reporter.info(&format!(
            "Running {} scenario(s) with {} session(s)",
            scenarios.len(),
            self.harness.effective_jobs()
        ));
        self.reporter
            .start_progress(scenarios.len() as u64, &self.harness.suite_name);

        let reporter = &self.reporter;
        let results = self
            .harness
            .run(factory, scenarios, |result| reporter.record(result))
            .await;
        self.reporter.finish();
        results
    }
}
