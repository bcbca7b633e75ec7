//! Suite lifecycle and the sequential runner.
//!
//! A suite run goes through three stages:
//! 1. One-time setup creates the fixture resources and records their ids
//! 2. Per-test setup builds a fresh [`CaseContext`] from the recorded ids
//! 3. The case itself runs against that context
//!
//! Cases whose fixture could not be created in stage 1 are reported as
//! skipped with the setup diagnostic; every other case still runs.

pub mod location;
pub mod place;

use std::time::Instant;

use async_trait::async_trait;

use crate::client::ApiClient;
use crate::config::HarnessConfig;
use crate::error::{CaseFailure, FixtureError, HarnessError};
use crate::fixture::{FixtureKind, FixtureStore};
use crate::report::{CaseOutcome, CaseReport, SuiteReport};

/// Id used for resources that must not exist.
pub const MISSING_ID: i64 = 99999;

/// A single named test case.
pub trait TestCase: Copy + Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// Fixtures that must have been created for this case to be meaningful.
    fn requires(&self) -> &'static [FixtureKind];
}

/// State shared by every case of one suite run.
pub struct SuiteContext {
    pub config: HarnessConfig,
    pub store: FixtureStore,
    client: ApiClient,
}

impl SuiteContext {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            store: FixtureStore::new(config.data_dir.clone()),
            client: ApiClient::new(config.base_url.clone()),
            config,
        }
    }

    /// Client used by one-time setup.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Slot name of `kind` for `suite` under the configured scope.
    pub fn fixture_key(&self, suite: &str, kind: FixtureKind) -> String {
        kind.key(self.config.scope, suite)
    }

    /// Records the id of a fixture created by `suite`.
    pub fn record(&self, suite: &str, kind: FixtureKind, id: i64) -> Result<(), FixtureError> {
        let key = self.fixture_key(suite, kind);
        self.store.set_id(&key, id)?;
        tracing::info!("{}: recorded {} fixture {} as '{}'", suite, kind, id, key);
        Ok(())
    }
}

/// Per-case state: a fresh client and the fixture ids the case needs.
#[derive(Debug)]
pub struct CaseContext {
    pub client: ApiClient,
    location_id: Option<i64>,
    place_id: Option<i64>,
}

impl CaseContext {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            location_id: None,
            place_id: None,
        }
    }

    pub fn with_fixture(mut self, kind: FixtureKind, id: i64) -> Self {
        match kind {
            FixtureKind::Location => self.location_id = Some(id),
            FixtureKind::Place => self.place_id = Some(id),
        }
        self
    }

    pub fn location_id(&self) -> Result<i64, CaseFailure> {
        self.location_id
            .ok_or_else(|| CaseFailure::assertion("no location fixture was loaded for this case"))
    }

    pub fn place_id(&self) -> Result<i64, CaseFailure> {
        self.place_id
            .ok_or_else(|| CaseFailure::assertion("no place fixture was loaded for this case"))
    }
}

/// Fixtures one-time setup failed to create.
#[derive(Debug, Default)]
pub struct SetupOutcome {
    failures: Vec<(FixtureKind, HarnessError)>,
}

impl SetupOutcome {
    pub fn fail(&mut self, kind: FixtureKind, error: HarnessError) {
        tracing::warn!("{} fixture unavailable: {}", kind, error);
        self.failures.push((kind, error));
    }

    pub fn failure(&self, kind: FixtureKind) -> Option<&HarnessError> {
        self.failures
            .iter()
            .find(|(failed, _)| *failed == kind)
            .map(|(_, error)| error)
    }
}

/// A CRUD suite against one resource.
#[async_trait]
pub trait Suite: Send + Sync {
    type Case: TestCase;

    fn name(&self) -> &'static str;

    /// Cases in execution order.
    fn cases(&self) -> &'static [Self::Case];

    /// Creates the suite's fixtures and records their ids. Runs once per suite run.
    async fn set_up_before_suite(&self, ctx: &SuiteContext) -> SetupOutcome;

    /// Executes one case.
    async fn run(&self, case: Self::Case, ctx: &CaseContext) -> Result<(), CaseFailure>;

    /// Builds the context for one case from the recorded fixture ids.
    fn set_up(&self, ctx: &SuiteContext, case: Self::Case) -> Result<CaseContext, CaseFailure> {
        let mut case_ctx = CaseContext::new(ApiClient::new(ctx.config.base_url.clone()));
        for &kind in case.requires() {
            let id = ctx.store.get_id(&ctx.fixture_key(self.name(), kind))?;
            case_ctx = case_ctx.with_fixture(kind, id);
        }
        Ok(case_ctx)
    }

    /// Names of the cases that need `kind`.
    fn dependents(&self, kind: FixtureKind) -> Vec<&'static str> {
        self.cases()
            .iter()
            .filter(|case| case.requires().contains(&kind))
            .map(|case| case.name())
            .collect()
    }

    /// Wraps a failed fixture creation into a diagnostic naming its dependents.
    fn setup_error(&self, kind: FixtureKind, source: CaseFailure) -> HarnessError {
        HarnessError::FixtureSetup {
            resource: kind.as_str(),
            dependents: self.dependents(kind),
            source: Box::new(source),
        }
    }
}

/// Runs one suite: one-time setup, then every case in order.
pub async fn run_suite<S: Suite>(suite: &S, ctx: &SuiteContext) -> SuiteReport {
    tracing::info!("Starting {}", suite.name());
    let mut report = SuiteReport::new(suite.name());

    let setup = suite.set_up_before_suite(ctx).await;
    report.setup_errors = setup
        .failures
        .iter()
        .map(|(_, error)| error.to_string())
        .collect();

    for &case in suite.cases() {
        let start = Instant::now();
        let skipped = case
            .requires()
            .iter()
            .find_map(|&kind| setup.failure(kind));

        let outcome = match skipped {
            Some(error) => {
                tracing::warn!("{}: skipping {}", suite.name(), case.name());
                CaseOutcome::Skipped(error.to_string())
            }
            None => match suite.set_up(ctx, case) {
                Err(e) => CaseOutcome::Failed(format!("setup failed: {}", e)),
                Ok(case_ctx) => match suite.run(case, &case_ctx).await {
                    Ok(()) => CaseOutcome::Passed,
                    Err(e) => CaseOutcome::Failed(e.to_string()),
                },
            },
        };

        tracing::debug!("{}: {} -> {:?}", suite.name(), case.name(), outcome);
        report.cases.push(CaseReport {
            name: case.name(),
            outcome,
            elapsed: start.elapsed(),
        });
    }

    tracing::info!(
        "Finished {}: {} passed, {} failed, {} skipped",
        suite.name(),
        report.passed(),
        report.failed(),
        report.skipped()
    );
    report
}
