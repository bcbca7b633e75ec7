//! Assertions used by the suites.
//!
//! Each helper returns a [`CaseFailure`] instead of panicking so the runner
//! can record the failure and move on to the next case.

use serde_json::Value;

use crate::client::ApiResponse;
use crate::error::{CaseFailure, ClientError};

/// Fails unless the response carries `expected` as its status.
pub fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), CaseFailure> {
    let actual = response.status_code();
    if actual != expected {
        return Err(CaseFailure::assertion(format!(
            "expected status {}, got {}",
            expected, actual
        )));
    }
    Ok(())
}

/// Fails unless `value` is an object where every field is present and non-null.
pub fn expect_fields(value: &Value, fields: &[&str]) -> Result<(), CaseFailure> {
    let object = value
        .as_object()
        .ok_or_else(|| CaseFailure::assertion(format!("expected an object, got {}", value)))?;
    if object.is_empty() {
        return Err(CaseFailure::assertion("expected a non-empty object"));
    }

    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| object.get(*field).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(CaseFailure::assertion(format!(
            "missing fields: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Fails unless `value` is a non-empty array whose first element has every field.
pub fn expect_first_element_fields(value: &Value, fields: &[&str]) -> Result<(), CaseFailure> {
    let items = value
        .as_array()
        .ok_or_else(|| CaseFailure::assertion(format!("expected an array, got {}", value)))?;
    let first = items
        .first()
        .ok_or_else(|| CaseFailure::assertion("expected a non-empty array"))?;
    expect_fields(first, fields)
}

/// Fails unless the response body is empty.
pub fn expect_empty_body(response: &ApiResponse) -> Result<(), CaseFailure> {
    if !response.is_empty() {
        return Err(CaseFailure::assertion(format!(
            "expected an empty body, got '{}'",
            response.body
        )));
    }
    Ok(())
}

/// Fails unless the call was rejected with exactly `expected`.
///
/// A call that succeeds is a failure, not a silent pass.
pub fn expect_client_error(
    result: Result<ApiResponse, ClientError>,
    expected: u16,
) -> Result<(), CaseFailure> {
    match result {
        Ok(response) => Err(CaseFailure::assertion(format!(
            "expected status {}, but the request succeeded with {}",
            expected,
            response.status_code()
        ))),
        Err(err) => match err.status() {
            Some(status) if status == expected => Ok(()),
            Some(status) => Err(CaseFailure::assertion(format!(
                "expected status {}, got {}",
                expected, status
            ))),
            None => Err(CaseFailure::Client(err)),
        },
    }
}

/// Fails unless `actual == expected`, naming `what` in the message.
pub fn expect_eq<T>(what: &str, actual: T, expected: T) -> Result<(), CaseFailure>
where
    T: PartialEq + std::fmt::Debug,
{
    if actual != expected {
        return Err(CaseFailure::assertion(format!(
            "expected {} to be {:?}, got {:?}",
            what, expected, actual
        )));
    }
    Ok(())
}
