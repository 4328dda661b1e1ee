use formats::RawBuilding;
use foundation::math::{Pixel, geo_to_pixel, world_size_px};
use streaming::ResponseBuilding;

/// A building ready for drawing at the current zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledBuilding {
    /// Height in pixels, `0..=max_height`.
    pub height: u32,
    /// Closed ring of world pixels, relative to the dataset origin.
    pub footprint: Vec<Pixel>,
    /// Still growing in with the current fade.
    pub is_new: bool,
}

impl ScaledBuilding {
    /// Identity key used to recognize a building across reloads.
    pub fn first_vertex(&self) -> Option<Pixel> {
        self.footprint.first().copied()
    }

    pub fn effective_height(&self, fade_factor: f64) -> f64 {
        if self.is_new {
            self.height as f64 * fade_factor
        } else {
            self.height as f64
        }
    }
}

/// Maps full-detail data onto a coarser zoom.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LevelOfDetail {
    pub max_zoom: u8,
    pub max_height: u32,
}

impl LevelOfDetail {
    pub fn new(max_zoom: u8, max_height: u32) -> Self {
        Self {
            max_zoom,
            max_height,
        }
    }

    /// Halves the height once per zoom level below `max_zoom`, then caps it.
    pub fn scale_height(&self, height: u32, zoom: u8) -> u32 {
        let shift = self.max_zoom.saturating_sub(zoom) as u32;
        height.checked_shr(shift).unwrap_or(0).min(self.max_height)
    }

    pub fn scale_buildings(&self, raw: &[RawBuilding], zoom: u8, is_new: bool) -> Vec<ScaledBuilding> {
        raw.iter()
            .map(|b| ScaledBuilding {
                height: self.scale_height(b.height, zoom),
                footprint: b
                    .footprint
                    .iter()
                    .map(|p| geo_to_pixel(p.lat_deg, p.lon_deg, zoom))
                    .collect(),
                is_new,
            })
            .collect()
    }

    /// Converts pre-scaled wire data for `zoom`, capping heights and dropping
    /// degenerate rings or rings reaching more than one world from the origin.
    pub fn from_response(&self, data: &[ResponseBuilding], zoom: u8) -> Vec<ScaledBuilding> {
        let limit = world_size_px(zoom).min(i32::MAX as f64 / 4.0);
        data.iter()
            .filter_map(|b| {
                let footprint = ring_from_flat(b.flat_footprint(), limit)?;
                let height = b.height().clamp(0.0, self.max_height as f64) as u32;
                Some(ScaledBuilding {
                    height,
                    footprint,
                    is_new: false,
                })
            })
            .collect()
    }
}

pub fn scale_height(height: u32, zoom: u8, max_zoom: u8, max_height: u32) -> u32 {
    LevelOfDetail::new(max_zoom, max_height).scale_height(height, zoom)
}

pub fn scale_buildings(
    raw: &[RawBuilding],
    zoom: u8,
    lod: &LevelOfDetail,
    is_new: bool,
) -> Vec<ScaledBuilding> {
    lod.scale_buildings(raw, zoom, is_new)
}

fn ring_from_flat(flat: &[f64], limit: f64) -> Option<Vec<Pixel>> {
    let coord = |v: f64| (v.is_finite() && v.abs() <= limit).then_some(v as i32);
    let mut ring = flat
        .chunks_exact(2)
        .map(|xy| Some(Pixel::new(coord(xy[0])?, coord(xy[1])?)))
        .collect::<Option<Vec<Pixel>>>()?;
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if first != last {
            ring.push(first);
        }
    }
    if !formats::has_min_distinct_vertices(&ring) {
        return None;
    }
    Some(ring)
}
