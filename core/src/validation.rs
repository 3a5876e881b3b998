//! Local precondition checks run before a request is built.
//!
//! A failed check returns `ApiError::Validation` and no request is sent.

use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::types::Geocode;

/// Largest `limit` accepted by any search endpoint.
pub const MAX_LIMIT: u32 = 100;
/// Largest postcode search radius, in meters.
pub const MAX_RADIUS: u32 = 2_000;
/// Largest outcode search radius, in meters.
pub const MAX_OUTCODE_RADIUS: u32 = 25_000;
/// Largest number of entries in a bulk request.
pub const MAX_BATCH: usize = 100;

fn reject(message: String) -> ApiError {
    debug!(%message, "rejected request locally");
    ApiError::validation(message)
}

pub fn check_limit(limit: Option<u32>) -> ApiResult<()> {
    match limit {
        Some(limit) if limit > MAX_LIMIT => Err(reject(format!(
            "maximum limit exceeded: limit must not exceed {MAX_LIMIT}, got {limit}"
        ))),
        _ => Ok(()),
    }
}

pub fn check_radius(radius: Option<u32>, max: u32) -> ApiResult<()> {
    match radius {
        Some(radius) if radius > max => Err(reject(format!(
            "maximum radius exceeded: radius must not exceed {max} meters, got {radius}"
        ))),
        _ => Ok(()),
    }
}

/// Both coordinates must be set; zero is treated as unset.
pub fn check_coordinates(geocode: &Geocode) -> ApiResult<()> {
    if geocode.latitude == 0.0 || geocode.longitude == 0.0 {
        return Err(reject(
            "latitude and longitude must be defined".to_string(),
        ));
    }
    Ok(())
}

/// `noun` is the singular name of a batch entry, e.g. "postcode".
pub fn check_batch_size(len: usize, noun: &str) -> ApiResult<()> {
    if len == 0 {
        return Err(reject(format!("minimum of 1 {noun} required")));
    }
    if len > MAX_BATCH {
        return Err(reject(format!(
            "maximum {noun} limit exceeded: maximum of {MAX_BATCH} {noun}s, got {len}"
        )));
    }
    Ok(())
}
