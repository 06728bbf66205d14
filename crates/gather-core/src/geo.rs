//! Great-circle distance and bounding-box helpers for geo search.
//!
//! The bounding box is a deliberate over-selection: it restricts a range query
//! to a rectangle before exact distances are computed, so box membership must
//! never be treated as a radius guarantee. Callers compute the exact haversine
//! distance afterwards for annotation and distance sorting.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude (and of longitude at the equator).
const KM_PER_DEGREE: f64 = 111.0;

/// Rectangular latitude/longitude pre-filter approximating a radius search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Great-circle distance between two coordinates in kilometres, rounded to
/// two decimal places.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    let distance = EARTH_RADIUS_KM * c;
    (distance * 100.0).round() / 100.0
}

/// Bounding box around a centre point using the flat approximations
/// 1 degree latitude = 111 km and longitude scaled by cos(latitude).
pub fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    // Longitude degrees shrink towards the poles; clamp the cosine so the
    // box stays finite near +/-90.
    let lon_scale = lat.to_radians().cos().max(1e-6);
    let lon_delta = radius_km / (KM_PER_DEGREE * lon_scale);

    BoundingBox {
        min_lat: lat - lat_delta,
        max_lat: lat + lat_delta,
        min_lon: lon - lon_delta,
        max_lon: lon + lon_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_distance() {
        assert_eq!(haversine_distance_km(48.8566, 2.3522, 48.8566, 2.3522), 0.0);
    }

    #[test]
    fn test_haversine_paris_london() {
        // Paris (48.8566, 2.3522) to London (51.5074, -0.1278) is ~344 km.
        let d = haversine_distance_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((d - 343.56).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_haversine_rounded_to_two_decimals() {
        let d = haversine_distance_km(30.2672, -97.7431, 32.7767, -96.7970);
        assert_eq!(d, (d * 100.0).round() / 100.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = haversine_distance_km(40.7128, -74.0060, 34.0522, -118.2437);
        let b = haversine_distance_km(34.0522, -118.2437, 40.7128, -74.0060);
        assert_eq!(a, b);
    }

    #[test]
    fn test_bounding_box_contains_centre() {
        let bb = bounding_box(30.2672, -97.7431, 25.0);
        assert!(bb.contains(30.2672, -97.7431));
    }

    #[test]
    fn test_bounding_box_latitude_delta() {
        let bb = bounding_box(0.0, 0.0, 111.0);
        assert!((bb.max_lat - 1.0).abs() < 1e-9);
        assert!((bb.min_lat + 1.0).abs() < 1e-9);
        // At the equator longitude scales the same as latitude.
        assert!((bb.max_lon - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_longitude_widens_away_from_equator() {
        let equator = bounding_box(0.0, 0.0, 50.0);
        let north = bounding_box(60.0, 0.0, 50.0);
        let eq_width = equator.max_lon - equator.min_lon;
        let north_width = north.max_lon - north.min_lon;
        assert!(north_width > eq_width);
        // cos(60 deg) = 0.5, so the box should be about twice as wide.
        assert!((north_width / eq_width - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_bounding_box_overselects_circle() {
        // A corner of the box lies outside the radius; that is expected and
        // why exact distance is recomputed by callers.
        let bb = bounding_box(30.0, -97.0, 50.0);
        let corner = haversine_distance_km(30.0, -97.0, bb.max_lat, bb.max_lon);
        assert!(corner > 50.0);
    }
}
