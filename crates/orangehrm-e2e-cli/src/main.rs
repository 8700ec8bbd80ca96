//! hrm-e2e: run the OrangeHRM My Info suite
//!
//! ## Usage
//!
//! ```bash
//! hrm-e2e list                               # Every scenario
//! hrm-e2e run                                # Run the whole suite
//! hrm-e2e run --filter membership -j 4       # Four sessions at a time
//! hrm-e2e run --format json -o report.json   # Machine-readable report
//! hrm-e2e config                             # Effective configuration
//! ```

use clap::Parser;
use orangehrm_e2e::{ScenarioId, SuiteConfig, SuiteResults};
use orangehrm_e2e_cli::{
    render, render_json, select_scenarios, Cli, CliConfig, CliError, CliResult, ColorChoice,
    Commands, ListArgs, OutputFormat, RunArgs, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Logs go to stderr so a JSON report on stdout stays parseable
fn init_logging(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, config: &CliConfig) -> CliResult<()> {
    match cli.command {
        Commands::List(args) => run_list(&args),
        Commands::Config => run_config(cli.config.as_deref()),
        Commands::Run(args) => run_suite(cli.config.as_deref(), config, &args),
    }
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    for scenario in select_scenarios(args.filter.as_deref())? {
        println!("{scenario}");
    }
    Ok(())
}

fn run_config(path: Option<&std::path::Path>) -> CliResult<()> {
    let suite = SuiteConfig::resolve(path)?;
    print!("{}", suite.redacted().to_yaml()?);
    Ok(())
}

fn run_suite(path: Option<&std::path::Path>, config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let mut suite = SuiteConfig::resolve(path)?;
    if args.headed {
        suite.browser.headless = false;
    }
    let scenarios = select_scenarios(args.filter.as_deref())?;

    let results = execute(suite, &scenarios, config, args)?;

    if let Some(ref output) = args.output {
        std::fs::write(output, render_json(&results)?)?;
    }
    let format = OutputFormat::from(args.format);
    let use_color = format == OutputFormat::Text && config.color.should_color();
    print!("{}", render(&results, format, use_color)?);

    if results.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: results.failed_count(),
            total: results.total(),
        })
    }
}

#[cfg(feature = "browser")]
fn execute(
    suite: SuiteConfig,
    scenarios: &[ScenarioId],
    config: &CliConfig,
    args: &RunArgs,
) -> CliResult<SuiteResults> {
    use orangehrm_e2e::ChromiumSessionFactory;
    use orangehrm_e2e_cli::{ProgressReporter, SuiteRunner};
    use std::sync::Arc;

    let reporter = ProgressReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet(),
    );
    let mut runner = SuiteRunner::new(args, reporter);
    let factory = ChromiumSessionFactory::new(Arc::new(suite));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(runner.run(&factory, scenarios)))
}

#[cfg(not(feature = "browser"))]
fn execute(
    _suite: SuiteConfig,
    _scenarios: &[ScenarioId],
    _config: &CliConfig,
    _args: &RunArgs,
) -> CliResult<SuiteResults> {
    Err(CliError::config(
        "hrm-e2e was built without the `browser` feature; rebuild with --features browser",
    ))
}
