//! Spherical-earth geodesy for route legs.
//!
//! Distances are in nautical miles, angles in degrees unless a function name
//! says otherwise.

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Positions closer than this are treated as the same point.
pub const POSITION_EPSILON_NM: f64 = 0.05;

/// Calculate great-circle distance between two points in nautical miles
/// (Haversine formula).
pub fn haversine_distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Calculate initial bearing from point 1 to point 2 in radians.
/// Returns bearing in radians, 0 = north, π/2 = east.
pub fn bearing_rad(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    x.atan2(y)
}

/// Initial true bearing from point 1 to point 2, whole degrees in `0..360`.
///
/// Returns `None` when the points coincide and the bearing is undefined.
pub fn rounded_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Option<u16> {
    if haversine_distance_nm(lat1, lon1, lat2, lon2) < POSITION_EPSILON_NM {
        return None;
    }
    let degrees = bearing_rad(lat1, lon1, lat2, lon2).to_degrees().rem_euclid(360.0);
    // 359.5 and above rounds up to 360, which is north again.
    Some((degrees.round() as u16) % 360)
}

/// Offset a position by distance and bearing.
///
/// # Arguments
/// * `lat`, `lon` - Starting position in degrees
/// * `distance_nm` - Distance in nautical miles
/// * `bearing_rad` - Bearing in radians (0 = north, π/2 = east)
///
/// # Returns
/// (new_lat, new_lon) in degrees
pub fn offset_by_bearing(lat: f64, lon: f64, distance_nm: f64, bearing_rad: f64) -> (f64, f64) {
    if distance_nm.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let angular_distance = distance_nm / EARTH_RADIUS_NM;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    (lat2.to_degrees(), lon2.to_degrees())
}

/// Point `distance_nm` along the great circle from point 1 toward point 2.
pub fn intermediate_point(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    distance_nm: f64,
) -> (f64, f64) {
    offset_by_bearing(lat1, lon1, distance_nm, bearing_rad(lat1, lon1, lat2, lon2))
}

/// Seconds needed to cover `distance_nm` at `speed_kts` ground speed.
pub fn travel_time_secs(distance_nm: f64, speed_kts: f64) -> f64 {
    distance_nm / speed_kts * 3600.0
}
