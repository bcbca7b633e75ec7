//! End-to-end CRUD harness for the Location/Place REST API.
//!
//! Provides the HTTP client, durable fixture slots, assertion helpers,
//! and the two CRUD suites with their sequential runner.

pub mod assert;
pub mod client;
pub mod config;
pub mod error;
pub mod fixture;
pub mod model;
pub mod report;
pub mod suite;

pub use client::{ApiClient, ApiResponse};
pub use config::{FixtureScope, HarnessConfig};
pub use error::{CaseFailure, ClientError, FixtureError, HarnessError};
pub use fixture::{FixtureKind, FixtureStore};
pub use report::{CaseOutcome, RunReport, SuiteReport};
pub use suite::{location::LocationSuite, place::PlaceSuite, run_suite, Suite, SuiteContext};
