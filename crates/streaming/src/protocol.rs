//! Wire types of the building load protocol.
//!
//! A client fills a URL template with the box it wants and its zoom:
//! `{w} {n} {e} {s} {z}`. The server answers with
//! `{ "meta": {n,w,s,e,x,y,z}, "data": [[height, [x0,y0,x1,y1,...]], ...] }`
//! where footprints are pixel coordinates at zoom `z`, relative to the
//! pixel origin `(x, y)`.

use foundation::GeoBounds;
use serde::{Deserialize, Serialize};

use crate::template::fill_template;

/// Box and zoom a load is issued for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoadRequest {
    pub bounds: GeoBounds,
    pub zoom: u8,
}

impl LoadRequest {
    pub fn new(bounds: GeoBounds, zoom: u8) -> Self {
        Self { bounds, zoom }
    }

    pub fn url(&self, template: &str) -> String {
        fill_template(template, |key| {
            let value = match key {
                "w" => self.bounds.west.to_string(),
                "n" => self.bounds.north.to_string(),
                "e" => self.bounds.east.to_string(),
                "s" => self.bounds.south.to_string(),
                "z" => self.zoom.to_string(),
                _ => return None,
            };
            Some(value)
        })
    }
}

/// Query string as received by a server.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadQuery {
    pub w: f64,
    pub n: f64,
    pub e: f64,
    pub s: f64,
    pub z: u8,
}

impl LoadQuery {
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::new(self.n, self.w, self.s, self.e)
    }
}

/// Extent and pixel origin of a response, echoing the zoom it was built for.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub n: f64,
    pub w: f64,
    pub s: f64,
    pub e: f64,
    pub x: i32,
    pub y: i32,
    pub z: u8,
}

impl ResponseMeta {
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::new(self.n, self.w, self.s, self.e)
    }
}

/// `[height, [x0, y0, x1, y1, ...]]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBuilding(pub f64, pub Vec<f64>);

impl ResponseBuilding {
    pub fn height(&self) -> f64 {
        self.0
    }

    pub fn flat_footprint(&self) -> &[f64] {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResponse {
    pub meta: ResponseMeta,
    #[serde(default)]
    pub data: Vec<ResponseBuilding>,
}

#[derive(Debug)]
pub enum ProtocolError {
    Decode(serde_json::Error),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Decode(e) => write!(f, "malformed load response: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl LoadResponse {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProtocolError> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Decode)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadRequest, LoadResponse, ResponseBuilding};
    use foundation::GeoBounds;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_fills_all_placeholders() {
        let req = LoadRequest::new(GeoBounds::new(52.53, 13.38, 52.51, 13.42), 15);
        let url = req.url("server/?w={w}&n={n}&e={e}&s={s}&z={z}");
        assert_eq!(url, "server/?w=13.38&n=52.53&e=13.42&s=52.51&z=15");
    }

    #[test]
    fn decodes_wire_response() {
        let payload = br#"{
            "meta": {"n": 52.53, "w": 13.38, "s": 52.51, "e": 13.42, "x": 100, "y": 200, "z": 15},
            "data": [[12, [0, 0, 10, 0, 10, 10, 0, 0]], [40, [5, 5, 6, 5, 6, 6, 5, 5]]]
        }"#;
        let res = LoadResponse::from_slice(payload).expect("decode");
        assert_eq!(res.meta.z, 15);
        assert_eq!(res.meta.x, 100);
        assert_eq!(res.data.len(), 2);
        assert_eq!(
            res.data[0],
            ResponseBuilding(12.0, vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 0.0])
        );
    }

    #[test]
    fn rejects_missing_meta() {
        assert!(LoadResponse::from_slice(br#"{"data": []}"#).is_err());
        assert!(LoadResponse::from_slice(b"").is_err());
    }
}
