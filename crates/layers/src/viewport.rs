use foundation::GeoBounds;
use foundation::math::{Pixel, pixel_to_geo};
use runtime::MapHost;
use streaming::ResponseMeta;

/// What the map currently shows, in world pixels at `zoom`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub center: Pixel,
    pub zoom: u8,
    pub is_zooming: bool,
}

impl Viewport {
    pub fn new(width: u32, height: u32, center: Pixel, zoom: u8) -> Self {
        Self {
            width,
            height,
            center,
            zoom,
            is_zooming: false,
        }
    }

    /// Reads the current geometry from the host map.
    pub fn from_host<H: MapHost + ?Sized>(host: &H, is_zooming: bool) -> Self {
        let (width, height) = host.viewport_size();
        Self {
            width,
            height,
            center: host.center_pixel(),
            zoom: host.zoom(),
            is_zooming,
        }
    }

    pub fn half_size(&self) -> Pixel {
        Pixel::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// World pixel at the top-left screen corner.
    pub fn top_left(&self) -> Pixel {
        self.center - self.half_size()
    }

    /// Geographic extent of the visible area.
    pub fn geo_bounds(&self) -> GeoBounds {
        self.bounds_around_center(self.half_size())
    }

    /// Twice the visible extent, centered on the viewport; what a load asks for.
    pub fn load_bounds(&self) -> GeoBounds {
        self.bounds_around_center(Pixel::new(self.width as i32, self.height as i32))
    }

    fn bounds_around_center(&self, half: Pixel) -> GeoBounds {
        let nw = self.center - half;
        let se = self.center + half;
        GeoBounds::from_corners(
            pixel_to_geo(nw.x as f64, nw.y as f64, self.zoom),
            pixel_to_geo(se.x as f64, se.y as f64, self.zoom),
        )
    }

    /// Strictly inside the screen rectangle.
    pub fn shows(&self, screen: Pixel) -> bool {
        screen.x > 0 && screen.x < self.width as i32 && screen.y > 0 && screen.y < self.height as i32
    }
}

/// Extent and pixel origin of the dataset currently held.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportMeta {
    pub bounds: GeoBounds,
    pub origin: Pixel,
    pub zoom: u8,
}

impl ViewportMeta {
    /// Meta for locally supplied data: whole world, absolute pixels.
    pub fn world(zoom: u8) -> Self {
        Self {
            bounds: GeoBounds::world(),
            origin: Pixel::new(0, 0),
            zoom,
        }
    }
}

impl From<&ResponseMeta> for ViewportMeta {
    fn from(meta: &ResponseMeta) -> Self {
        Self {
            bounds: meta.bounds(),
            origin: Pixel::new(meta.x, meta.y),
            zoom: meta.z,
        }
    }
}
