//! Records mirroring the postcodes.io JSON schemas.
//!
//! # Design
//! Upstream may omit or null any field, so every scalar is an `Option` and
//! every struct carries `#[serde(default)]`. Absent fields are skipped on
//! serialization so a record re-encodes to the same sparse shape it came
//! from. The types are plain values with no behavior beyond serde.

use serde::{Deserialize, Serialize};

/// A single postcode and its associated administrative and geographic data.
///
/// `distance` is only populated by nearest-postcode and reverse geocode
/// results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Postcode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eastings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub northings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nhs_ha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_ward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parliamentary_constituency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub european_electoral_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_care_trust: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsoa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msoa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ced: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nuts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codes: Option<Codes>,
}

/// GSS codes for the administrative areas a postcode falls in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Codes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_ward: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parliamentary_constituency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccg_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ccg_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ced: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nuts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lau2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsoa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msoa: Option<String>,
}

/// Centroid and administrative areas for an outward code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Outcode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub northings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eastings: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_district: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parish: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_county: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub admin_ward: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub country: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// A named place from the OS Open Names dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_1_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_2_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county_unitary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county_unitary_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_borough: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_borough_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eastings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub northings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_eastings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_northings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_eastings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_northings: Option<i64>,
}

/// Scottish Postcode Directory data for a postcode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScottishPostcode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scottish_parliamentary_constituency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codes: Option<ScottishCodes>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScottishCodes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scottish_parliamentary_constituency: Option<String>,
}

/// A postcode that is no longer in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminatedPostcode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_terminated: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_terminated: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
}

/// A proximity query around a longitude/latitude pair.
///
/// `limit` defaults to 10 upstream and may not exceed 100; `radius` is in
/// meters, defaults to 100 and may not exceed 2,000. With `wide_search` set
/// the upstream service searches up to 20km but returns at most 10 results,
/// ignoring radius and limits over 10.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geocode {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    #[serde(
        default,
        rename = "widesearch",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub wide_search: bool,
}

impl Geocode {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_wide_search(mut self, wide_search: bool) -> Self {
        self.wide_search = wide_search;
        self
    }
}

/// Request payload for a bulk postcode lookup: `{"postcodes": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcodeBatch {
    pub postcodes: Vec<String>,
}

impl PostcodeBatch {
    pub fn new<I, S>(postcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            postcodes: postcodes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request payload for bulk reverse geocoding: `{"geolocations": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeBatch {
    pub geolocations: Vec<Geocode>,
}

impl GeocodeBatch {
    pub fn new(geolocations: impl IntoIterator<Item = Geocode>) -> Self {
        Self {
            geolocations: geolocations.into_iter().collect(),
        }
    }
}

/// One entry of a bulk lookup result. `result` is `None` when the queried
/// postcode does not exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostcodeMatch {
    pub query: String,
    #[serde(default)]
    pub result: Option<Postcode>,
}

/// One entry of a bulk reverse geocode result. `result` is `None` when no
/// postcode lies within the search area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub query: Geocode,
    #[serde(default)]
    pub result: Option<Vec<Postcode>>,
}

/// The error record carried by upstream failure responses:
/// `{"status": 404, "error": "Postcode not found"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub status: u16,
    #[serde(default)]
    pub error: String,
}
