//! Harness error types.

use thiserror::Error;

/// Run-level errors.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Missing or unusable base URL
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// One-time fixture creation failed
    #[error(
        "{resource} creation does not work ({source}). Tests won't work for: {}. \
         Please fix {resource} creation before launching tests.",
        .dependents.join(", ")
    )]
    FixtureSetup {
        resource: &'static str,
        dependents: Vec<&'static str>,
        #[source]
        source: Box<CaseFailure>,
    },

    /// Fixture slot error
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

/// HTTP client errors.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-2xx response
    #[error("Client error: `{method} {path}` resulted in a `{status}` response")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    /// Connection, TLS or protocol failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Path could not be resolved against the base URL
    #[error("Invalid request path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Response body is not the expected JSON
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns the HTTP status code for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fixture slot errors.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// Slot was never written
    #[error("Fixture '{key}' has not been recorded")]
    NotFound { key: String },

    /// Slot name is not a relative path of plain segments
    #[error("Invalid fixture key '{0}'")]
    InvalidKey(String),

    /// Slot holds something other than an id
    #[error("Fixture '{key}' holds an invalid id: '{value}'")]
    Corrupt { key: String, value: String },

    /// I/O error while reading or writing a slot
    #[error("I/O error: {0}")]
    Io(String),
}

/// Why a single test case did not pass.
#[derive(Error, Debug)]
pub enum CaseFailure {
    /// An assertion on status or body did not hold
    #[error("{0}")]
    Assertion(String),

    /// Unexpected client error
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Per-test setup could not read a fixture
    #[error(transparent)]
    Fixture(#[from] FixtureError),
}

impl CaseFailure {
    pub fn assertion(message: impl Into<String>) -> Self {
        CaseFailure::Assertion(message.into())
    }
}

impl From<serde_json::Error> for CaseFailure {
    fn from(err: serde_json::Error) -> Self {
        CaseFailure::Client(ClientError::Decode(err))
    }
}
