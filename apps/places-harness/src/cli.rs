use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use places_harness_core::config::DEFAULT_DATA_DIR;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the API under test (e.g. http://localhost:8000)
    pub base_url: Option<String>,

    /// Directory holding the fixture slots
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Suites to run; repeat to select several (default: all)
    #[arg(long = "suite", value_enum)]
    pub suites: Vec<SuiteName>,

    /// Share the un-namespaced `location`/`place` slots between suites
    #[arg(long)]
    pub shared_fixtures: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteName {
    Location,
    Place,
    All,
}

impl Cli {
    /// Whether `suite` was selected.
    pub fn runs(&self, suite: SuiteName) -> bool {
        self.suites.is_empty()
            || self
                .suites
                .iter()
                .any(|selected| *selected == suite || *selected == SuiteName::All)
    }
}
