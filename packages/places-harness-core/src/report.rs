//! Suite and run results.

use std::fmt;
use std::time::Duration;

/// Result of one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed(String),
    Skipped(String),
}

impl CaseOutcome {
    fn label(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "ok",
            CaseOutcome::Failed(_) => "FAILED",
            CaseOutcome::Skipped(_) => "skipped",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: &'static str,
    pub outcome: CaseOutcome,
    pub elapsed: Duration,
}

/// Results of one suite run.
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub suite: &'static str,
    /// Diagnostics from one-time setup, one per fixture that could not be created
    pub setup_errors: Vec<String>,
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn new(suite: &'static str) -> Self {
        Self {
            suite,
            setup_errors: Vec::new(),
            cases: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Skipped(_)))
    }

    /// True when every case passed.
    pub fn is_success(&self) -> bool {
        self.setup_errors.is_empty() && self.passed() == self.cases.len()
    }

    /// Outcome of the named case, if it ran.
    pub fn outcome(&self, name: &str) -> Option<&CaseOutcome> {
        self.cases
            .iter()
            .find(|case| case.name == name)
            .map(|case| &case.outcome)
    }

    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|case| pred(&case.outcome)).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.suite)?;
        for error in &self.setup_errors {
            writeln!(f, "  setup error: {}", error)?;
        }
        for case in &self.cases {
            write!(
                f,
                "  {:<7} {} ({} ms)",
                case.outcome.label(),
                case.name,
                case.elapsed.as_millis()
            )?;
            match &case.outcome {
                CaseOutcome::Passed => writeln!(f)?,
                CaseOutcome::Failed(reason) | CaseOutcome::Skipped(reason) => {
                    writeln!(f, "\n          {}", reason)?
                }
            }
        }
        Ok(())
    }
}

/// Results of every suite in a run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    pub fn push(&mut self, report: SuiteReport) {
        self.suites.push(report);
    }

    pub fn is_success(&self) -> bool {
        self.suites.iter().all(SuiteReport::is_success)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for suite in &self.suites {
            writeln!(f, "{}", suite)?;
        }

        let total: usize = self.suites.iter().map(|s| s.cases.len()).sum();
        let passed: usize = self.suites.iter().map(SuiteReport::passed).sum();
        let failed: usize = self.suites.iter().map(SuiteReport::failed).sum();
        let skipped: usize = self.suites.iter().map(SuiteReport::skipped).sum();
        write!(
            f,
            "{}: tests {}, passed {}, failed {}, skipped {}",
            if self.is_success() { "OK" } else { "FAILURES" },
            total,
            passed,
            failed,
            skipped
        )
    }
}
