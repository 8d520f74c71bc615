//! Geographic helpers: great-circle distance and radius bounding boxes.

use crate::types::property::GeoPoint;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// A latitude/longitude box used as a cheap pre-filter before exact
/// distance scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Box of `radius_km` around a center point.
    ///
    /// The longitude delta widens with latitude since meridians converge
    /// toward the poles.
    pub fn around(center: GeoPoint, radius_km: f64) -> Self {
        let lat_delta = radius_km / KM_PER_DEGREE;
        let lon_delta = radius_km / (KM_PER_DEGREE * center.latitude.to_radians().cos());
        Self {
            min_latitude: center.latitude - lat_delta,
            max_latitude: center.latitude + lat_delta,
            min_longitude: center.longitude - lon_delta,
            max_longitude: center.longitude + lon_delta,
        }
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.latitude >= self.min_latitude
            && point.latitude <= self.max_latitude
            && point.longitude >= self.min_longitude
            && point.longitude <= self.max_longitude
    }
}

/// Haversine great-circle distance in kilometers, rounded to 2 decimals.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let distance = 2.0 * EARTH_RADIUS_KM * h.sqrt().asin();
    (distance * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = GeoPoint::new(40.0, -3.0);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn madrid_to_barcelona_is_roughly_505_km() {
        let madrid = GeoPoint::new(40.4168, -3.7038);
        let barcelona = GeoPoint::new(41.3874, 2.1686);
        let d = haversine_km(madrid, barcelona);
        assert!((d - 505.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn bounding_box_contains_center_and_excludes_far_points() {
        let center = GeoPoint::new(40.0, -3.0);
        let bbox = BoundingBox::around(center, 2.0);
        assert!(bbox.contains(center));
        assert!(bbox.contains(GeoPoint::new(40.01, -3.01)));
        assert!(!bbox.contains(GeoPoint::new(41.0, -3.0)));
        assert!(!bbox.contains(GeoPoint::new(40.0, -4.0)));
    }

    #[test]
    fn longitude_delta_widens_with_latitude() {
        let equator = BoundingBox::around(GeoPoint::new(0.0, 0.0), 2.0);
        let north = BoundingBox::around(GeoPoint::new(60.0, 0.0), 2.0);
        let equator_width = equator.max_longitude - equator.min_longitude;
        let north_width = north.max_longitude - north.min_longitude;
        assert!(north_width > equator_width);
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            lat_a in -80.0f64..80.0,
            lon_a in -179.0f64..179.0,
            lat_b in -80.0f64..80.0,
            lon_b in -179.0f64..179.0,
        ) {
            let a = GeoPoint::new(lat_a, lon_a);
            let b = GeoPoint::new(lat_b, lon_b);
            prop_assert_eq!(haversine_km(a, b), haversine_km(b, a));
        }

        #[test]
        fn distance_is_non_negative(
            lat_a in -80.0f64..80.0,
            lon_a in -179.0f64..179.0,
            lat_b in -80.0f64..80.0,
            lon_b in -179.0f64..179.0,
        ) {
            prop_assert!(haversine_km(GeoPoint::new(lat_a, lon_a), GeoPoint::new(lat_b, lon_b)) >= 0.0);
        }
    }
}
