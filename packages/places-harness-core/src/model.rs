//! Resource and request types for the Location/Place API.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fields every Location response must carry.
pub const LOCATION_FIELDS: [&str; 7] = [
    "id",
    "created_at",
    "updated_at",
    "name",
    "slug",
    "lat",
    "lng",
];

/// Fields every Place response must carry.
pub const PLACE_FIELDS: [&str; 6] = ["id", "created_at", "updated_at", "name", "lat", "lng"];

/// Top-level geographic resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub name: String,
    /// Derived from `name` by the server
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::coordinate")]
    pub lng: Option<f64>,
}

/// Point of interest nested under a [`Location`].
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::coordinate")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub visited: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub location_id: Option<i64>,
}

/// `POST /api/locations` body.
#[derive(Debug, Clone, Serialize)]
pub struct LocationForm {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl LocationForm {
    pub fn new(name: &str, lat: f64, lng: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lng,
        }
    }
}

/// `POST /api/locations/{id}/places` body.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceForm {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl PlaceForm {
    pub fn new(name: &str, lat: f64, lng: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lng,
        }
    }
}

/// `PUT /api/places/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceUpdateForm {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(serialize_with = "flag_as_int")]
    pub visited: bool,
    pub location_id: i64,
}

// Form validators on the server side accept 1/0 but not "true"/"false".
fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// Decoders that accept the looser encodings form-backed APIs emit.
mod lenient {
    use super::*;
    use serde::de::Error;
    use serde_json::Value;

    fn as_i64(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        as_i64(&value).ok_or_else(|| D::Error::custom(format!("invalid id: {}", value)))
    }

    pub fn optional_id<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => as_i64(&value)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid id: {}", value))),
        }
    }

    pub fn coordinate<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid coordinate: '{}'", s))),
            other => Err(D::Error::custom(format!("invalid coordinate: {}", other))),
        }
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(b)),
            value => match as_i64(&value) {
                Some(0) => Ok(Some(false)),
                Some(1) => Ok(Some(true)),
                _ => Err(D::Error::custom(format!("invalid flag: {}", value))),
            },
        }
    }
}
