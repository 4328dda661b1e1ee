use crate::math::GeoPoint;

/// Geographic bounding box in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn new(north: f64, west: f64, south: f64, east: f64) -> Self {
        Self {
            north,
            west,
            south,
            east,
        }
    }

    pub fn world() -> Self {
        Self::new(90.0, -180.0, -90.0, 180.0)
    }

    /// Box spanned by a north-west and a south-east corner.
    pub fn from_corners(nw: GeoPoint, se: GeoPoint) -> Self {
        Self::new(nw.lat_deg, nw.lon_deg, se.lat_deg, se.lon_deg)
    }

    /// True if `inner` lies completely inside `self` (edges inclusive).
    pub fn contains(&self, inner: &GeoBounds) -> bool {
        inner.north <= self.north
            && inner.west >= self.west
            && inner.south >= self.south
            && inner.east <= self.east
    }

    pub fn contains_point(&self, p: GeoPoint) -> bool {
        p.lat_deg <= self.north
            && p.lat_deg >= self.south
            && p.lon_deg >= self.west
            && p.lon_deg <= self.east
    }
}
