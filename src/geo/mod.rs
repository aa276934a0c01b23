pub mod index;
pub mod search;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Maximum search radius; providers beyond this are excluded entirely.
pub const SEARCH_RADIUS_M: f64 = 5_000.0;

/// Geographic coordinate, longitude first per geospatial convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

/// A coordinate of zero on either axis is treated as absent, matching the
/// client convention of sending zeros when no location is known.
pub fn validate_point(point: &GeoPoint) -> Result<(), AppError> {
    if !point.lng.is_finite() || !point.lat.is_finite() {
        return Err(AppError::BadRequest(
            "coordinates must be finite numbers".to_string(),
        ));
    }

    if point.lng == 0.0 || point.lat == 0.0 {
        return Err(AppError::BadRequest("location required".to_string()));
    }

    if !(-180.0..=180.0).contains(&point.lng) || !(-90.0..=90.0).contains(&point.lat) {
        return Err(AppError::BadRequest(format!(
            "coordinates out of range: lng {}, lat {}",
            point.lng, point.lat
        )));
    }

    Ok(())
}

pub fn haversine_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_M * central_angle
}
