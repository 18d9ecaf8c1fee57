use crate::geometry::Vec2;
use crate::models::Coordinates;

const M_PER_DEG_LAT: f64 = 111_132.0;
const M_PER_DEG_LNG_EQUATOR: f64 = 111_320.0;

/// Local equirectangular projection around an origin point.
///
/// All meter-space math in the pipeline runs in this frame so that repeated
/// conversions are reproducible for a given start point. The longitude scale
/// is fixed at the origin latitude.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: Coordinates,
    m_per_deg_lng: f64,
}

impl LocalProjection {
    pub fn new(origin: Coordinates) -> Self {
        LocalProjection {
            origin,
            m_per_deg_lng: M_PER_DEG_LNG_EQUATOR * origin.lat.to_radians().cos(),
        }
    }

    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    /// Geographic point to meters east/north of the origin.
    pub fn to_meters(&self, point: &Coordinates) -> Vec2 {
        Vec2 {
            x: (point.lng - self.origin.lng) * self.m_per_deg_lng,
            y: (point.lat - self.origin.lat) * M_PER_DEG_LAT,
        }
    }

    /// Meters east/north of the origin back to a geographic point.
    pub fn to_wgs84(&self, point: &Vec2) -> Coordinates {
        Coordinates {
            lat: self.origin.lat + point.y / M_PER_DEG_LAT,
            lng: self.origin.lng + point.x / self.m_per_deg_lng,
        }
    }

    /// Squared meter distance between a geographic point and the origin frame
    /// coordinates of another, cheap enough for nearest-node scans.
    pub fn distance_sq_m(&self, a: &Coordinates, b: &Coordinates) -> f64 {
        let pa = self.to_meters(a);
        let pb = self.to_meters(b);
        let dx = pa.x - pb.x;
        let dy = pa.y - pb.y;
        dx * dx + dy * dy
    }
}
