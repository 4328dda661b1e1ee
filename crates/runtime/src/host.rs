use foundation::math::Pixel;

/// The narrow view of a slippy map an overlay needs.
///
/// Pixel positions are absolute world pixels at the current zoom.
pub trait MapHost {
    /// Viewport size in pixels, `(width, height)`.
    fn viewport_size(&self) -> (u32, u32);
    fn center_pixel(&self) -> Pixel;
    fn zoom(&self) -> u8;
    /// Highest zoom the map's tile layers serve, if known.
    fn max_zoom(&self) -> Option<u8> {
        None
    }
}

/// Notifications a host forwards to its overlays.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapEvent {
    Resize { width: u32, height: u32 },
    Move { center: Pixel },
    MoveEnd { center: Pixel },
    ZoomStart,
    ZoomEnd { zoom: u8, center: Pixel },
}

/// Host state captured once, e.g. when attaching or for headless use.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StaticHost {
    pub width: u32,
    pub height: u32,
    pub center: Pixel,
    pub zoom: u8,
    pub max_zoom: Option<u8>,
}

impl MapHost for StaticHost {
    fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn center_pixel(&self) -> Pixel {
        self.center
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn max_zoom(&self) -> Option<u8> {
        self.max_zoom
    }
}
