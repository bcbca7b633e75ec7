//! CLI runner for the Location/Place API CRUD suites.
//!
//! Runs the location suite then the place suite against a live API,
//! prints a per-case report and exits non-zero unless every case passed.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use places_harness_core::{
    run_suite, FixtureScope, HarnessConfig, LocationSuite, PlaceSuite, RunReport, SuiteContext,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, SuiteName};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let scope = if cli.shared_fixtures {
        FixtureScope::Shared
    } else {
        FixtureScope::Isolated
    };
    let config = HarnessConfig::new(cli.base_url.as_deref())?
        .with_data_dir(cli.data_dir.clone())
        .with_scope(scope);

    tracing::info!(
        "Testing {} (fixtures in {:?}, scope {:?})",
        config.base_url,
        config.data_dir,
        config.scope
    );

    let ctx = SuiteContext::new(config);
    let mut report = RunReport::default();
    if cli.runs(SuiteName::Location) {
        report.push(run_suite(&LocationSuite, &ctx).await);
    }
    if cli.runs(SuiteName::Place) {
        report.push(run_suite(&PlaceSuite, &ctx).await);
    }

    println!("{}", report);

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
