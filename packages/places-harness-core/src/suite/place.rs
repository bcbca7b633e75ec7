//! CRUD cases for places nested under a location.
//!
//! One-time setup seeds its own location and a place under it, so this suite
//! does not depend on the location suite having run first.

use async_trait::async_trait;
use serde_json::Value;

use super::location::{seed_location, SEED_COORDINATE};
use super::{CaseContext, SetupOutcome, Suite, SuiteContext, TestCase, MISSING_ID};
use crate::assert::{
    expect_client_error, expect_empty_body, expect_eq, expect_fields, expect_first_element_fields,
    expect_status,
};
use crate::client::ApiClient;
use crate::error::CaseFailure;
use crate::fixture::FixtureKind;
use crate::model::{Place, PlaceForm, PlaceUpdateForm, PLACE_FIELDS};

/// Name of the place created during one-time setup.
pub const SEED_PLACE_NAME: &str = "Test Place";
/// Place id used by the update-of-missing-place case.
pub const MISSING_PLACE_ID: i64 = 999;

pub fn location_places_path(location_id: i64) -> String {
    format!("/api/locations/{}/places", location_id)
}

pub fn place_path(id: i64) -> String {
    format!("/api/places/{}", id)
}

/// Creates the seed place under `location_id` and returns its id.
pub async fn seed_place(client: &ApiClient, location_id: i64) -> Result<i64, CaseFailure> {
    let form = PlaceForm::new(SEED_PLACE_NAME, SEED_COORDINATE, SEED_COORDINATE);
    let response = client
        .post_form(&location_places_path(location_id), &form)
        .await?;
    let place: Place = response.json()?;
    Ok(place.id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceCase {
    GetPlaces,
    AddPlace,
    AddPlaceWithIncorrectArguments,
    UpdatePlace,
    UpdatePlaceWithIncorrectArguments,
    UpdatePlaceDoesNotExist,
    DeletePlace,
    DeletedPlaceIsGone,
    DeletePlaceDoesNotExist,
}

const CASES: [PlaceCase; 9] = [
    PlaceCase::GetPlaces,
    PlaceCase::AddPlace,
    PlaceCase::AddPlaceWithIncorrectArguments,
    PlaceCase::UpdatePlace,
    PlaceCase::UpdatePlaceWithIncorrectArguments,
    PlaceCase::UpdatePlaceDoesNotExist,
    PlaceCase::DeletePlace,
    PlaceCase::DeletedPlaceIsGone,
    PlaceCase::DeletePlaceDoesNotExist,
];

impl TestCase for PlaceCase {
    fn name(&self) -> &'static str {
        match self {
            PlaceCase::GetPlaces => "get_places",
            PlaceCase::AddPlace => "add_place",
            PlaceCase::AddPlaceWithIncorrectArguments => "add_place_with_incorrect_arguments",
            PlaceCase::UpdatePlace => "update_place",
            PlaceCase::UpdatePlaceWithIncorrectArguments => {
                "update_place_with_incorrect_arguments"
            }
            PlaceCase::UpdatePlaceDoesNotExist => "update_place_does_not_exist",
            PlaceCase::DeletePlace => "delete_place",
            PlaceCase::DeletedPlaceIsGone => "deleted_place_is_gone",
            PlaceCase::DeletePlaceDoesNotExist => "delete_place_does_not_exist",
        }
    }

    fn requires(&self) -> &'static [FixtureKind] {
        match self {
            PlaceCase::GetPlaces | PlaceCase::AddPlace | PlaceCase::AddPlaceWithIncorrectArguments => {
                &[FixtureKind::Location]
            }
            PlaceCase::UpdatePlace => &[FixtureKind::Location, FixtureKind::Place],
            PlaceCase::UpdatePlaceWithIncorrectArguments
            | PlaceCase::DeletePlace
            | PlaceCase::DeletedPlaceIsGone => &[FixtureKind::Place],
            PlaceCase::UpdatePlaceDoesNotExist | PlaceCase::DeletePlaceDoesNotExist => &[],
        }
    }
}

/// Place CRUD suite.
#[derive(Debug, Default)]
pub struct PlaceSuite;

#[async_trait]
impl Suite for PlaceSuite {
    type Case = PlaceCase;

    fn name(&self) -> &'static str {
        "place-suite"
    }

    fn cases(&self) -> &'static [PlaceCase] {
        &CASES
    }

    async fn set_up_before_suite(&self, ctx: &SuiteContext) -> SetupOutcome {
        let mut outcome = SetupOutcome::default();

        let location_id = match seed_location(ctx.client()).await {
            Ok(id) => id,
            Err(source) => {
                outcome.fail(
                    FixtureKind::Location,
                    self.setup_error(FixtureKind::Location, source),
                );
                outcome.fail(
                    FixtureKind::Place,
                    self.setup_error(
                        FixtureKind::Place,
                        CaseFailure::assertion("no location to create it under"),
                    ),
                );
                return outcome;
            }
        };
        if let Err(e) = ctx.record(self.name(), FixtureKind::Location, location_id) {
            outcome.fail(
                FixtureKind::Location,
                self.setup_error(FixtureKind::Location, e.into()),
            );
        }

        match seed_place(ctx.client(), location_id).await {
            Ok(id) => {
                if let Err(e) = ctx.record(self.name(), FixtureKind::Place, id) {
                    outcome.fail(
                        FixtureKind::Place,
                        self.setup_error(FixtureKind::Place, e.into()),
                    );
                }
            }
            Err(source) => outcome.fail(
                FixtureKind::Place,
                self.setup_error(FixtureKind::Place, source),
            ),
        }
        outcome
    }

    async fn run(&self, case: PlaceCase, ctx: &CaseContext) -> Result<(), CaseFailure> {
        match case {
            PlaceCase::GetPlaces => get_places(ctx).await,
            PlaceCase::AddPlace => add_place(ctx).await,
            PlaceCase::AddPlaceWithIncorrectArguments => {
                let path = location_places_path(ctx.location_id()?);
                expect_client_error(ctx.client.post(&path).await, 422)
            }
            PlaceCase::UpdatePlace => update_place(ctx).await,
            PlaceCase::UpdatePlaceWithIncorrectArguments => {
                let path = place_path(ctx.place_id()?);
                expect_client_error(ctx.client.put(&path).await, 422)
            }
            PlaceCase::UpdatePlaceDoesNotExist => {
                let form = PlaceForm::new("Test", SEED_COORDINATE, SEED_COORDINATE);
                let result = ctx
                    .client
                    .put_form(&place_path(MISSING_PLACE_ID), &form)
                    .await;
                expect_client_error(result, 404)
            }
            PlaceCase::DeletePlace => delete_place(ctx).await,
            PlaceCase::DeletedPlaceIsGone => {
                let path = place_path(ctx.place_id()?);
                expect_client_error(ctx.client.delete(&path).await, 404)
            }
            PlaceCase::DeletePlaceDoesNotExist => {
                expect_client_error(ctx.client.delete(&place_path(MISSING_ID)).await, 404)
            }
        }
    }
}

async fn get_places(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let path = location_places_path(ctx.location_id()?);
    let response = ctx.client.get(&path).await?;
    expect_status(&response, 200)?;

    let places: Value = response.json()?;
    expect_first_element_fields(&places, &PLACE_FIELDS)
}

async fn add_place(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let path = location_places_path(ctx.location_id()?);
    let form = PlaceForm::new("Test", SEED_COORDINATE, SEED_COORDINATE);
    let response = ctx.client.post_form(&path, &form).await?;
    expect_status(&response, 201)?;

    let body: Value = response.json()?;
    expect_fields(&body, &PLACE_FIELDS)
}

async fn update_place(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let place_id = ctx.place_id()?;
    let form = PlaceUpdateForm {
        name: "Test".to_string(),
        lat: SEED_COORDINATE,
        lng: SEED_COORDINATE,
        visited: true,
        location_id: ctx.location_id()?,
    };
    let response = ctx.client.put_form(&place_path(place_id), &form).await?;
    expect_status(&response, 200)?;

    let body: Value = response.json()?;
    expect_fields(&body, &PLACE_FIELDS)?;

    let place: Place = serde_json::from_value(body)?;
    expect_eq("id", place.id, place_id)?;
    expect_eq("name", place.name.as_str(), "Test")?;
    if let Some(visited) = place.visited {
        expect_eq("visited", visited, true)?;
    }
    Ok(())
}

async fn delete_place(ctx: &CaseContext) -> Result<(), CaseFailure> {
    let response = ctx.client.delete(&place_path(ctx.place_id()?)).await?;
    expect_status(&response, 204)?;
    expect_empty_body(&response)
}
