//! Geolocation data structures.

use serde::Serialize;

/// Resolved location for one IP address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoRecord {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Country name, when the provider knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// City name, when the provider knows it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// A `GeoRecord` correlated with the IP it was resolved for.
///
/// Serializes flat as `{"query", "lat", "lon", "country"?, "city"?}`, the same
/// shape the batch provider returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    /// The queried address
    #[serde(rename = "query")]
    pub ip: String,
    /// Where it was placed
    #[serde(flatten)]
    pub record: GeoRecord,
}

impl GeoPoint {
    /// Pairs an address with its record.
    pub fn new(ip: impl Into<String>, record: GeoRecord) -> Self {
        Self {
            ip: ip.into(),
            record,
        }
    }

    /// The literal `"lat,lon"` key used to group points by coordinate.
    pub fn coordinate_key(&self) -> String {
        format!("{},{}", self.record.lat, self.record.lon)
    }
}
