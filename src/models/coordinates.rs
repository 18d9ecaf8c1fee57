use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Haversine distance to another coordinate, in meters.
    pub fn distance_m(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_000.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Round coordinates to a fixed number of decimal places for cache keys.
    pub fn round(&self, decimal_places: u32) -> Self {
        let multiplier = 10_f64.powi(decimal_places as i32);
        Coordinates {
            lat: (self.lat * multiplier).round() / multiplier,
            lng: (self.lng * multiplier).round() / multiplier,
        }
    }
}

/// Haversine length of a geographic polyline, in meters.
pub fn polyline_length_m(coords: &[Coordinates]) -> f64 {
    coords.windows(2).map(|w| w[0].distance_m(&w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation() {
        assert!(Coordinates::new(33.4996, 126.5312).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn haversine_distance() {
        let paris = Coordinates::new(48.8566, 2.3522).unwrap();
        let london = Coordinates::new(51.5074, -0.1278).unwrap();

        let distance = paris.distance_m(&london);
        // Paris to London is approximately 344 km
        assert!((distance - 344_000.0).abs() < 10_000.0);
    }

    #[test]
    fn rounding() {
        let coords = Coordinates::new(33.499614, 126.531222).unwrap();
        let rounded = coords.round(3);
        assert_eq!(rounded.lat, 33.5);
        assert_eq!(rounded.lng, 126.531);
    }

    #[test]
    fn polyline_length_sums_segments() {
        let a = Coordinates::new(33.4996, 126.5312).unwrap();
        let b = Coordinates::new(33.5086, 126.5312).unwrap(); // ~1km north
        let c = Coordinates::new(33.5176, 126.5312).unwrap();

        let total = polyline_length_m(&[a, b, c]);
        let parts = a.distance_m(&b) + b.distance_m(&c);
        assert!((total - parts).abs() < 1e-6);
        assert!((total - 2000.0).abs() < 20.0);
    }

    #[test]
    fn polyline_length_degenerate() {
        let a = Coordinates::new(33.4996, 126.5312).unwrap();
        assert_eq!(polyline_length_m(&[a]), 0.0);
        assert_eq!(polyline_length_m(&[]), 0.0);
    }
}
