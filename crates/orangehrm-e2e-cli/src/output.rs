//! Output formatting and progress reporting

use crate::error::CliResult;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use orangehrm_e2e::{Outcome, SuiteResults, TestResult};
use serde::{Deserialize, Serialize};

/// Output format for suite results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Live progress on stderr while scenarios run
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Report one finished scenario and advance the bar
    pub fn record(&self, result: &TestResult) {
        let label = format!("{} - {} ({}ms)", result.id.id(), result.title, result.duration_ms);
        match result.outcome {
            Outcome::Passed => self.success(&label),
            Outcome::Failed => {
                let reason = result.error.as_deref().unwrap_or("unknown error");
                self.failure(&format!("{label}: {reason}"));
            }
            Outcome::Skipped => self.warning(&format!("{label} skipped")),
        }
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(text),
            None => {
                let _ = self.term.write_line(text);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Failures are printed in quiet mode too
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "SKIP".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.line(&format!("{prefix} {message}"));
    }
}

/// Final report in `format`
pub fn render(results: &SuiteResults, format: OutputFormat, use_color: bool) -> CliResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(results, use_color)),
        OutputFormat::Json => render_json(results),
    }
}

/// Pretty JSON report
pub fn render_json(results: &SuiteResults) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Text report: failures with their class and reason, then one summary line
#[must_use]
pub fn render_text(results: &SuiteResults, use_color: bool) -> String {
    let mut out = String::new();
    let failures = results.failures();
    if !failures.is_empty() {
        out.push_str("Failures:\n");
        for failure in &failures {
            let kind = failure
                .kind
                .map_or_else(String::new, |k| format!(" [{}]", kind_label(k)));
            out.push_str(&format!(
                "  {}{kind}: {}\n",
                failure.id,
                failure.error.as_deref().unwrap_or("unknown error")
            ));
        }
        out.push('\n');
    }

    let status = if results.all_passed() { "PASSED" } else { "FAILED" };
    let status = match (use_color, results.all_passed()) {
        (false, _) => status.to_string(),
        (true, true) => style(status).green().bold().to_string(),
        (true, false) => style(status).red().bold().to_string(),
    };
    #[allow(clippy::cast_precision_loss)]
    let secs = results.duration_ms as f64 / 1000.0;
    out.push_str(&format!(
        "{status} {} scenarios in {secs:.2}s ({} passed, {} failed, {} skipped)\n",
        results.total(),
        results.passed_count(),
        results.failed_count(),
        results.skipped_count()
    ));
    out
}

const fn kind_label(kind: orangehrm_e2e::FailureKind) -> &'static str {
    match kind {
        orangehrm_e2e::FailureKind::Assertion => "assertion",
        orangehrm_e2e::FailureKind::Interaction => "interaction",
        orangehrm_e2e::FailureKind::Setup => "setup",
    }
}
