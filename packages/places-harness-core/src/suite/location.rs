//! CRUD cases for `/api/locations`.

use async_trait::async_trait;
use serde_json::Value;

use super::{CaseContext, SetupOutcome, Suite, SuiteContext, TestCase, MISSING_ID};
use crate::assert::{
    expect_client_error, expect_empty_body, expect_eq, expect_fields, expect_first_element_fields,
    expect_status,
};
use crate::client::ApiClient;
use crate::error::CaseFailure;
use crate::fixture::FixtureKind;
use crate::model::{Location, LocationForm, LOCATION_FIELDS};

const LOCATIONS: &str = "/api/locations";

/// Name of the location created during one-time setup.
pub const SEED_LOCATION_NAME: &str = "Test Location";
/// Coordinate used for every location and place the suites create.
pub const SEED_COORDINATE: f64 = 99.9;

pub fn location_path(id: i64) -> String {
    format!("{}/{}", LOCATIONS, id)
}

/// Creates the seed location and returns its id.
pub async fn seed_location(client: &ApiClient) -> Result<i64, CaseFailure> {
    let form = LocationForm::new(SEED_LOCATION_NAME, SEED_COORDINATE, SEED_COORDINATE);
    let response = client.post_form(LOCATIONS, &form).await?;
    let location: Location = response.json()?;
    Ok(location.id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationCase {
    GetLocations,
    GetLocation,
    GetLocationDoesNotExist,
    AddLocation,
    AddLocationWithIncorrectArguments,
    DeleteLocation,
    DeletedLocationIsGone,
    DeleteLocationDoesNotExist,
}

const CASES: [LocationCase; 8] = [
    LocationCase::GetLocations,
    LocationCase::GetLocation,
    LocationCase::GetLocationDoesNotExist,
    LocationCase::AddLocation,
    LocationCase::AddLocationWithIncorrectArguments,
    LocationCase::DeleteLocation,
    LocationCase::DeletedLocationIsGone,
    LocationCase::DeleteLocationDoesNotExist,
];

impl TestCase for LocationCase {
    fn name(&self) -> &'static str {
        match self {
            LocationCase::GetLocations => "get_locations",
            LocationCase::GetLocation => "get_location",
            LocationCase::GetLocationDoesNotExist => "get_location_does_not_exist",
            LocationCase::AddLocation => "add_location",
            LocationCase::AddLocationWithIncorrectArguments => {
                "add_location_with_incorrect_arguments"
            }
            LocationCase::DeleteLocation => "delete_location",
            LocationCase::DeletedLocationIsGone => "deleted_location_is_gone",
            LocationCase::DeleteLocationDoesNotExist => "delete_location_does_not_exist",
        }
    }

    fn requires(&self) -> &'static [FixtureKind] {
        match self {
            LocationCase::GetLocation
            | LocationCase::DeleteLocation
            | LocationCase::DeletedLocationIsGone => &[FixtureKind::Location],
            _ => &[],
        }
    }
}

/// Location CRUD suite. Seeds one location for its own cases.
#[derive(Debug, Default)]
pub struct LocationSuite;

#[async_trait]
impl Suite for LocationSuite {
    type Case = LocationCase;

    fn name(&self) -> &'static str {
        "location-suite"
    }

    fn cases(&self) -> &'static [LocationCase] {
        &CASES
    }

    async fn set_up_before_suite(&self, ctx: &SuiteContext) -> SetupOutcome {
        let mut outcome = SetupOutcome::default();
        match seed_location(ctx.client()).await {
            Ok(id) => {
                if let Err(e) = ctx.record(self.name(), FixtureKind::Location, id) {
                    outcome.fail(
                        FixtureKind::Location,
                        self.setup_error(FixtureKind::Location, e.into()),
                    );
                }
            }
            Err(source) => outcome.fail(
                FixtureKind::Location,
                self.setup_error(FixtureKind::Location, source),
            ),
        }
        outcome
    }

    async fn run(&self, case: LocationCase, ctx: &CaseContext) -> Result<(), CaseFailure> {
        match case {
            LocationCase::GetLocations => get_locations(ctx).await,
            LocationCase::GetLocation => get_location(ctx).await,
            LocationCase::GetLocationDoesNotExist => {
                expect_client_error(ctx.client.get(&location_path(MISSING_ID)).await, 404)
            }
            LocationCase::AddLocation => add_location(ctx).await,
            LocationCase::AddLocationWithIncorrectArguments => {
                expect_client_error(ctx.client.post(LOCATIONS).await, 422)
            }
            LocationCase::DeleteLocation => delete_location(ctx).await,
            LocationCase::DeletedLocationIsGone => {
                let id = ctx.location_id()?;
                expect_client_error(ctx.client.get(&location_path(id)).await, 404)
            }
            LocationCase::DeleteLocationDoesNotExist => {
                expect_client_error(ctx.client.delete(&location_path(MISSING_ID)).await, 404)
            }
        }
    }
}

async fn get_locations(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let response = ctx.client.get(LOCATIONS).await?;
    expect_status(&response, 200)?;

    let locations: Value = response.json()?;
    expect_first_element_fields(&locations, &LOCATION_FIELDS)
}

async fn get_location(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let id = ctx.location_id()?;
    let response = ctx.client.get(&location_path(id)).await?;
    expect_status(&response, 200)?;

    let body: Value = response.json()?;
    expect_fields(&body, &LOCATION_FIELDS)?;

    let location: Location = serde_json::from_value(body)?;
    expect_eq("id", location.id, id)?;
    expect_eq("name", location.name.as_str(), SEED_LOCATION_NAME)
}

async fn add_location(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let form = LocationForm::new("Test", SEED_COORDINATE, SEED_COORDINATE);
    let response = ctx.client.post_form(LOCATIONS, &form).await?;
    expect_status(&response, 201)?;

    let body: Value = response.json()?;
    expect_fields(&body, &LOCATION_FIELDS)
}

async fn delete_location(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let id = ctx.location_id()?;
    let response = ctx.client.delete(&location_path(id)).await?;
    expect_status(&response, 204)?;
    expect_empty_body(&response)
}
