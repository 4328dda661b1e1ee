//! Web-Mercator pixel addressing compatible with slippy-map tile servers.
//!
//! A zoom level `z` maps the world onto a square of `TILE_SIZE * 2^z` pixels with
//! the origin in the north-west corner and y growing southwards.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::{GeoPoint, Pixel};

/// Edge length of one map tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// Edge length of the whole world in pixels at `zoom`.
pub fn world_size_px(zoom: u8) -> f64 {
    TILE_SIZE as f64 * 2f64.powi(zoom as i32)
}

/// Inverse Web-Mercator.
///
/// Latitudes beyond the world edges collapse onto the poles. Longitudes wrap
/// around the antimeridian; the exact east edge maps to 180.
pub fn pixel_to_geo(x: f64, y: f64, zoom: u8) -> GeoPoint {
    let size = world_size_px(zoom);
    let fx = x / size;
    let fy = y / size;

    let lat_deg = if fy <= 0.0 {
        90.0
    } else if fy >= 1.0 {
        -90.0
    } else {
        (2.0 * (PI * (1.0 - 2.0 * fy)).exp().atan() - FRAC_PI_2).to_degrees()
    };

    let wrapped = if fx == 1.0 { 1.0 } else { (fx % 1.0 + 1.0) % 1.0 };
    let lon_deg = wrapped * 360.0 - 180.0;

    GeoPoint::new(lat_deg, lon_deg)
}

/// Forward Web-Mercator, truncating toward zero.
pub fn geo_to_pixel(lat_deg: f64, lon_deg: f64, zoom: u8) -> Pixel {
    let size = world_size_px(zoom);
    let lat_frac = (0.5 - (FRAC_PI_4 + FRAC_PI_2 * lat_deg / 180.0).tan().ln() / PI / 2.0)
        .clamp(0.0, 1.0);
    let lon_frac = lon_deg / 360.0 + 0.5;

    Pixel::new((lon_frac * size) as i32, (lat_frac * size) as i32)
}
