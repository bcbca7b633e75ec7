//! Harness configuration.

use std::path::PathBuf;

use reqwest::Url;

use crate::error::HarnessError;

/// Fixture directory used when none is given.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// How suites name their fixture slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixtureScope {
    /// Each suite writes under its own namespace
    #[default]
    Isolated,
    /// All suites share the `location` and `place` slots; the last suite to run wins
    Shared,
}

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Base URL of the API under test
    pub base_url: Url,
    /// Directory holding fixture slots
    pub data_dir: PathBuf,
    /// Fixture slot naming
    pub scope: FixtureScope,
}

impl HarnessConfig {
    /// Builds a configuration from an externally supplied base URL.
    ///
    /// # Returns
    /// `Err(HarnessError::Configuration)` when the URL is absent, blank, or
    /// not an absolute http(s) URL.
    pub fn new(base_url: Option<&str>) -> Result<Self, HarnessError> {
        let raw = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| HarnessError::Configuration("please enter a URL.".to_string()))?;

        let base_url = Url::parse(raw).map_err(|e| {
            HarnessError::Configuration(format!("invalid base URL '{}': {}", raw, e))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HarnessError::Configuration(format!(
                "base URL '{}' must use http or https",
                raw
            )));
        }

        Ok(Self {
            base_url,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            scope: FixtureScope::default(),
        })
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_scope(mut self, scope: FixtureScope) -> Self {
        self.scope = scope;
        self
    }
}
