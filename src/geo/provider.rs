//! Wire format of the batch geolocation provider.
//!
//! Requests are a JSON array of `{"query", "fields"}` objects. The response is
//! a parallel array of loosely-typed entries; each one is validated here into
//! a `GeoPoint` or rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{GeoPoint, GeoRecord};
use crate::config::GEO_QUERY_FIELDS;

/// One query in a batch request body.
#[derive(Debug, Serialize)]
pub struct BatchQuery<'a> {
    /// Address to locate
    pub query: &'a str,
    /// Comma-separated response fields
    pub fields: &'static str,
}

impl<'a> BatchQuery<'a> {
    /// Query for one address with the standard field list.
    pub fn new(ip: &'a str) -> Self {
        Self {
            query: ip,
            fields: GEO_QUERY_FIELDS,
        }
    }
}

/// One entry of a batch response, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawGeoEntry {
    /// Echo of the queried address
    #[serde(default)]
    pub query: Option<String>,
    /// `success` or `fail`
    #[serde(default)]
    pub status: Option<String>,
    /// Failure reason, when `status` is `fail`
    #[serde(default)]
    pub message: Option<String>,
    /// Latitude; null when unresolved
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude; null when unresolved
    #[serde(default)]
    pub lon: Option<f64>,
    /// Country name
    #[serde(default)]
    pub country: Option<String>,
    /// City name
    #[serde(default)]
    pub city: Option<String>,
}

/// Why a response entry did not produce a point.
#[derive(Debug, Error, PartialEq)]
pub enum EntryRejection {
    /// Not an object, or a field of the wrong type
    #[error("entry is not an object of the expected shape")]
    Malformed,
    /// No `query` to correlate the entry with a requested address
    #[error("entry has no query to correlate with")]
    MissingQuery,
    /// The provider could not place the address
    #[error("{query} could not be resolved: {reason}")]
    Unresolved {
        /// The address
        query: String,
        /// Provider message, or why the coordinates were rejected
        reason: String,
    },
}

impl RawGeoEntry {
    /// Validates the entry.
    ///
    /// Coordinates that are absent, null, zero, or non-finite mean the provider
    /// could not place the address.
    pub fn into_point(self) -> Result<GeoPoint, EntryRejection> {
        let query = self
            .query
            .filter(|q| !q.is_empty())
            .ok_or(EntryRejection::MissingQuery)?;

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if is_coordinate(lat) && is_coordinate(lon) => Ok(GeoPoint::new(
                query,
                GeoRecord {
                    lat,
                    lon,
                    country: self.country.filter(|c| !c.is_empty()),
                    city: self.city.filter(|c| !c.is_empty()),
                },
            )),
            _ => {
                let reason = self
                    .message
                    .or(self.status)
                    .unwrap_or_else(|| "no coordinates".to_string());
                Err(EntryRejection::Unresolved { query, reason })
            }
        }
    }
}

fn is_coordinate(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

/// Validates one element of a decoded response array.
pub fn parse_entry(value: serde_json::Value) -> Result<GeoPoint, EntryRejection> {
    serde_json::from_value::<RawGeoEntry>(value)
        .map_err(|_| EntryRejection::Malformed)?
        .into_point()
}
