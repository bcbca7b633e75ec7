//! Minimal in-memory implementation of the Location/Place REST surface.
//!
//! Behaves like the real API for the calls the suites make, and can be told
//! to misbehave so the harness's failure paths can be exercised.

use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use matchit::Router as MatchitRouter;
use parking_lot::Mutex;
use percent_encoding::percent_decode_str;
use places_harness_core::HarnessConfig;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const TIMESTAMP: &str = "2024-01-01T00:00:00.000000Z";

/// Switches that make the stub deviate from the real API.
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    /// `POST /api/locations` answers 500
    pub fail_location_create: bool,
    /// `POST /api/locations/{id}/places` answers 500
    pub fail_place_create: bool,
    /// Unknown ids answer as if they existed
    pub found_for_missing: bool,
    /// `GET /api/locations/{id}` reports a different name than was stored
    pub wrong_name_on_get: bool,
    /// `PUT /api/places/{id}` answers 200 with the place left unchanged
    pub ignore_update: bool,
    /// `PUT /api/places/{id}` stores the update but never marks the place visited
    pub drop_visited: bool,
}

#[derive(Debug, Default)]
pub struct StubState {
    pub faults: Faults,
    next_id: i64,
    locations: BTreeMap<i64, Value>,
    places: BTreeMap<i64, Value>,
}

impl StubState {
    pub fn has_location(&self, id: i64) -> bool {
        self.locations.contains_key(&id)
    }

    pub fn has_place(&self, id: i64) -> bool {
        self.places.contains_key(&id)
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn handle(
        &mut self,
        route: Route,
        method: &Method,
        id: Option<i64>,
        form: &HashMap<String, String>,
    ) -> (u16, Option<Value>) {
        match (route, method) {
            (Route::Locations, &Method::GET) => {
                (200, Some(Value::Array(self.locations.values().cloned().collect())))
            }
            (Route::Locations, &Method::POST) => {
                let Some((name, lat, lng)) = named_point(form) else {
                    return invalid();
                };
                if self.faults.fail_location_create {
                    return server_error();
                }
                let id = self.next_id();
                let location = json!({
                    "id": id,
                    "created_at": TIMESTAMP,
                    "updated_at": TIMESTAMP,
                    "name": name,
                    "slug": slugify(&name),
                    "lat": lat,
                    "lng": lng,
                });
                self.locations.insert(id, location.clone());
                (201, Some(location))
            }
            (Route::Location, &Method::GET) => match id.and_then(|id| self.locations.get(&id)) {
                Some(location) => {
                    let mut location = location.clone();
                    if self.faults.wrong_name_on_get {
                        location["name"] = json!("Renamed Location");
                    }
                    (200, Some(location))
                }
                None => self.missing(),
            },
            (Route::Location, &Method::DELETE) => {
                match id.filter(|id| self.locations.remove(id).is_some()) {
                    Some(location_id) => {
                        self.places
                            .retain(|_, place| place["location_id"] != json!(location_id));
                        (204, None)
                    }
                    None => self.missing_deleted(),
                }
            }
            (Route::LocationPlaces, _) => {
                let Some(location_id) = id.filter(|id| self.locations.contains_key(id)) else {
                    return not_found();
                };
                match *method {
                    Method::GET => {
                        let places = self
                            .places
                            .values()
                            .filter(|place| place["location_id"] == json!(location_id))
                            .cloned()
                            .collect();
                        (200, Some(Value::Array(places)))
                    }
                    Method::POST => {
                        let Some((name, lat, lng)) = named_point(form) else {
                            return invalid();
                        };
                        if self.faults.fail_place_create {
                            return server_error();
                        }
                        let id = self.next_id();
                        // Coordinates come back as strings, as decimal columns often do
                        let place = json!({
                            "id": id,
                            "created_at": TIMESTAMP,
                            "updated_at": TIMESTAMP,
                            "name": name,
                            "lat": lat.to_string(),
                            "lng": lng.to_string(),
                            "visited": false,
                            "location_id": location_id,
                        });
                        self.places.insert(id, place.clone());
                        (201, Some(place))
                    }
                    _ => (405, None),
                }
            }
            (Route::Place, &Method::GET) => match id.and_then(|id| self.places.get(&id)) {
                Some(place) => (200, Some(place.clone())),
                None => self.missing(),
            },
            (Route::Place, &Method::PUT) => {
                let Some(place_id) = id.filter(|id| self.places.contains_key(id)) else {
                    return self.missing();
                };
                if self.faults.ignore_update {
                    return (200, self.places.get(&place_id).cloned());
                }
                let Some((name, lat, lng)) = named_point(form) else {
                    return invalid();
                };
                let visited = match form.get("visited").map(String::as_str) {
                    Some("1") => true,
                    Some("0") => false,
                    _ => return invalid(),
                };
                let Some(location_id) = form
                    .get("location_id")
                    .and_then(|v| v.parse::<i64>().ok())
                    .filter(|id| self.locations.contains_key(id))
                else {
                    return invalid();
                };

                let place = json!({
                    "id": place_id,
                    "created_at": TIMESTAMP,
                    "updated_at": TIMESTAMP,
                    "name": name,
                    "lat": lat,
                    "lng": lng,
                    "visited": u8::from(visited && !self.faults.drop_visited),
                    "location_id": location_id,
                });
                self.places.insert(place_id, place.clone());
                (200, Some(place))
            }
            (Route::Place, &Method::DELETE) => match id.and_then(|id| self.places.remove(&id)) {
                Some(_) => (204, None),
                None => self.missing_deleted(),
            },
            _ => (405, None),
        }
    }

    fn missing(&self) -> (u16, Option<Value>) {
        if self.faults.found_for_missing {
            (200, Some(json!({})))
        } else {
            not_found()
        }
    }

    fn missing_deleted(&self) -> (u16, Option<Value>) {
        if self.faults.found_for_missing {
            (204, None)
        } else {
            not_found()
        }
    }
}

fn not_found() -> (u16, Option<Value>) {
    (404, Some(json!({"message": "Not Found"})))
}

fn invalid() -> (u16, Option<Value>) {
    (422, Some(json!({"message": "The given data was invalid."})))
}

fn server_error() -> (u16, Option<Value>) {
    (500, Some(json!({"message": "Server Error"})))
}

fn named_point(form: &HashMap<String, String>) -> Option<(String, f64, f64)> {
    let name = form.get("name").filter(|name| !name.is_empty())?;
    let lat = form.get("lat")?.parse().ok()?;
    let lng = form.get("lng")?.parse().ok()?;
    Some((name.clone(), lat, lng))
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Decodes an `application/x-www-form-urlencoded` body.
fn parse_form(body: &[u8]) -> HashMap<String, String> {
    let body = String::from_utf8_lossy(body).replace('+', " ");
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| {
            (
                percent_decode_str(key).decode_utf8_lossy().into_owned(),
                percent_decode_str(value).decode_utf8_lossy().into_owned(),
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum Route {
    Locations,
    Location,
    LocationPlaces,
    Place,
}

fn router() -> MatchitRouter<Route> {
    let mut router = MatchitRouter::new();
    router
        .insert("/api/locations", Route::Locations)
        .expect("Failed to insert /api/locations route");
    router
        .insert("/api/locations/{id}", Route::Location)
        .expect("Failed to insert /api/locations/{id} route");
    router
        .insert("/api/locations/{id}/places", Route::LocationPlaces)
        .expect("Failed to insert /api/locations/{id}/places route");
    router
        .insert("/api/places/{id}", Route::Place)
        .expect("Failed to insert /api/places/{id} route");
    router
}

/// A running stub bound to an ephemeral local port.
pub struct StubApi {
    pub addr: SocketAddr,
    pub state: Arc<Mutex<StubState>>,
    handle: JoinHandle<()>,
}

impl StubApi {
    pub async fn spawn() -> Self {
        Self::spawn_with(Faults::default()).await
    }

    pub async fn spawn_with(faults: Faults) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let state = Arc::new(Mutex::new(StubState {
            faults,
            ..Default::default()
        }));

        let handle = tokio::spawn(serve(listener, Arc::new(router()), state.clone()));
        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self, data_dir: &Path) -> HarnessConfig {
        HarnessConfig::new(Some(&self.base_url()))
            .expect("Stub URL is valid")
            .with_data_dir(data_dir)
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(
    listener: TcpListener,
    router: Arc<MatchitRouter<Route>>,
    state: Arc<Mutex<StubState>>,
) {
    loop {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let io = TokioIo::new(stream);
        let router = Arc::clone(&router);
        let state = Arc::clone(&state);

        tokio::task::spawn(async move {
            let service = hyper::service::service_fn(move |req| {
                handle_request(req, router.clone(), state.clone())
            });
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                eprintln!("Error serving connection: {}", err);
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    router: Arc<MatchitRouter<Route>>,
    state: Arc<Mutex<StubState>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => Bytes::new(),
    };

    let (status, json) = match router.at(&path) {
        Ok(matched) => {
            let id = matched.params.get("id").and_then(|id| id.parse().ok());
            state
                .lock()
                .handle(*matched.value, &method, id, &parse_form(&body))
        }
        Err(_) => not_found(),
    };

    let builder = Response::builder().status(status);
    let response = match json {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(json.to_string()))),
        None => builder.body(Full::new(Bytes::new())),
    };
    Ok(response.expect("Stub response is well-formed"))
}
