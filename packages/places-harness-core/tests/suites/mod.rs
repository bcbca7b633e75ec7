//! End-to-end runs of both suites against an in-process stand-in for the API.
//!
//! Tests:
//! 1. Location suite against a conforming and a misbehaving API
//! 2. Place suite, including partial one-time setup failures
//! 3. Fixture slot scoping and persistence across suites and runs

mod stub_api;
