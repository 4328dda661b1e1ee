use std::path::Path;

use formats::{CoordOrder, FootprintError, RawBuilding, buildings_from_geojson_str};
use foundation::math::geo_to_pixel;
use layers::LevelOfDetail;
use streaming::{LoadQuery, LoadResponse, ResponseBuilding, ResponseMeta};

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Footprint(FootprintError),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "reading building file failed: {e}"),
            DatasetError::Footprint(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            DatasetError::Footprint(e) => Some(e),
        }
    }
}

/// Full-detail buildings held in memory, answered per request box.
#[derive(Debug, Clone)]
pub struct BuildingIndex {
    buildings: Vec<RawBuilding>,
    lod: LevelOfDetail,
}

impl BuildingIndex {
    pub fn new(buildings: Vec<RawBuilding>, lod: LevelOfDetail) -> Self {
        Self { buildings, lod }
    }

    pub async fn load(path: &Path, order: CoordOrder, lod: LevelOfDetail) -> Result<Self, DatasetError> {
        let payload = tokio::fs::read_to_string(path)
            .await
            .map_err(DatasetError::Io)?;
        let buildings = buildings_from_geojson_str(&payload, order).map_err(DatasetError::Footprint)?;
        Ok(Self::new(buildings, lod))
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    /// Buildings with at least one vertex inside the query box, as pixels at
    /// the query zoom relative to the box's north-west corner.
    pub fn query(&self, query: &LoadQuery) -> LoadResponse {
        let bounds = query.bounds();
        let zoom = query.z;
        let origin = geo_to_pixel(bounds.north, bounds.west, zoom);

        let data = self
            .buildings
            .iter()
            .filter(|b| b.footprint.iter().any(|&p| bounds.contains_point(p)))
            .map(|b| {
                let mut flat = Vec::with_capacity(b.footprint.len() * 2);
                for p in &b.footprint {
                    let px = geo_to_pixel(p.lat_deg, p.lon_deg, zoom) - origin;
                    flat.push(px.x as f64);
                    flat.push(px.y as f64);
                }
                ResponseBuilding(self.lod.scale_height(b.height, zoom) as f64, flat)
            })
            .collect();

        LoadResponse {
            meta: ResponseMeta {
                n: bounds.north,
                w: bounds.west,
                s: bounds.south,
                e: bounds.east,
                x: origin.x,
                y: origin.y,
                z: zoom,
            },
            data,
        }
    }
}
