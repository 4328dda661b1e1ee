/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }
}

/// Integer pixel position, y grows downwards.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// z component of `self × other`, evaluated in `i64` so large zoom levels cannot overflow.
    pub fn cross(self, other: Self) -> i64 {
        self.x as i64 * other.y as i64 - self.y as i64 * other.x as i64
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self::new(self.x.checked_add(other.x)?, self.y.checked_add(other.y)?))
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        Some(Self::new(self.x.checked_sub(other.x)?, self.y.checked_sub(other.y)?))
    }
}

impl std::ops::Add for Pixel {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Pixel {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}
