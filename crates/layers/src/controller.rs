use std::collections::HashSet;

use formats::RawBuilding;
use foundation::math::Pixel;
use streaming::{
    LoadRequest, LoadResponse, RequestSlot, RequestToken, Transport, TransportError,
};
use tracing::{debug, warn};

use crate::scale::{LevelOfDetail, ScaledBuilding, scale_buildings};
use crate::viewport::{Viewport, ViewportMeta};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Accepted { buildings: usize, new: usize },
    /// Built for another zoom than the one shown now.
    Stale { echoed: u8, current: u8 },
    /// Not the request in flight (superseded or unknown).
    Superseded,
    /// Transport or decode failure; the previous dataset stays.
    Failed,
}

impl ResponseOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ResponseOutcome::Accepted { .. })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ZoomOutcome {
    /// Raw data was rescaled locally.
    Rescaled,
    /// No local data; a load was attempted.
    Reloading(Option<RequestToken>),
}

/// Keeps the displayed dataset in sync with the viewport.
///
/// Loads are issued for twice the visible area. A loaded dataset is kept until
/// the view leaves its box or the zoom changes; responses for a stale zoom or
/// a superseded request are dropped without touching state.
#[derive(Debug)]
pub struct ViewportDataController {
    min_zoom: u8,
    lod: LevelOfDetail,
    url_template: Option<String>,
    slot: RequestSlot,
    state: LoadState,
    raw: Option<Vec<RawBuilding>>,
    data: Option<Vec<ScaledBuilding>>,
    meta: Option<ViewportMeta>,
}

impl ViewportDataController {
    pub fn new(min_zoom: u8, lod: LevelOfDetail) -> Self {
        Self {
            min_zoom,
            lod,
            url_template: None,
            slot: RequestSlot::new(),
            state: LoadState::Idle,
            raw: None,
            data: None,
            meta: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn meta(&self) -> Option<&ViewportMeta> {
        self.meta.as_ref()
    }

    pub fn raw(&self) -> Option<&[RawBuilding]> {
        self.raw.as_deref()
    }

    pub fn buildings(&self) -> &[ScaledBuilding] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn buildings_mut(&mut self) -> &mut [ScaledBuilding] {
        self.data.as_deref_mut().unwrap_or_default()
    }

    pub fn has_dataset(&self) -> bool {
        self.meta.is_some() && self.data.is_some()
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.slot.in_flight()
    }

    pub fn level_of_detail(&self) -> LevelOfDetail {
        self.lod
    }

    pub fn set_level_of_detail(&mut self, lod: LevelOfDetail) {
        self.lod = lod;
    }

    pub fn set_url_template(&mut self, template: impl Into<String>) {
        self.url_template = Some(template.into());
    }

    /// Issues a load for twice the viewport, replacing any request in flight.
    ///
    /// Does nothing without a URL template or below the minimum zoom.
    pub fn request_load<T: Transport + ?Sized>(
        &mut self,
        viewport: &Viewport,
        transport: &mut T,
    ) -> Option<RequestToken> {
        let template = self.url_template.as_deref()?;
        if viewport.zoom < self.min_zoom {
            return None;
        }

        let request = LoadRequest::new(viewport.load_bounds(), viewport.zoom);
        let url = request.url(template);
        let token = self.slot.issue(transport, &url);
        self.state = LoadState::Loading;
        Some(token)
    }

    /// True when the current dataset was built for another zoom or does not
    /// cover the visible area.
    pub fn needs_reload(&self, viewport: &Viewport) -> bool {
        match &self.meta {
            Some(meta) => {
                meta.zoom != viewport.zoom || !meta.bounds.contains(&viewport.geo_bounds())
            }
            None => true,
        }
    }

    pub fn on_move_end<T: Transport + ?Sized>(
        &mut self,
        viewport: &Viewport,
        transport: &mut T,
    ) -> Option<RequestToken> {
        if !self.needs_reload(viewport) {
            return None;
        }
        self.request_load(viewport, transport)
    }

    pub fn on_zoom_end<T: Transport + ?Sized>(
        &mut self,
        viewport: &Viewport,
        transport: &mut T,
    ) -> ZoomOutcome {
        let Some(raw) = self.raw.as_deref() else {
            return ZoomOutcome::Reloading(self.request_load(viewport, transport));
        };

        self.data = Some(scale_buildings(raw, viewport.zoom, &self.lod, false));
        if let Some(meta) = self.meta.as_mut() {
            meta.zoom = viewport.zoom;
        }
        ZoomOutcome::Rescaled
    }

    /// Replaces everything with locally supplied buildings, or clears with `None`.
    ///
    /// Any request in flight is cancelled so it cannot overwrite the new data.
    pub fn set_raw<T: Transport + ?Sized>(
        &mut self,
        raw: Option<Vec<RawBuilding>>,
        zoom: u8,
        transport: &mut T,
    ) {
        self.slot.cancel(transport);
        match raw {
            Some(raw) => {
                self.data = Some(scale_buildings(&raw, zoom, &self.lod, true));
                self.meta = Some(ViewportMeta::world(zoom));
                self.raw = Some(raw);
                self.state = LoadState::Loaded;
            }
            None => {
                self.raw = None;
                self.data = None;
                self.meta = None;
                self.state = LoadState::Idle;
            }
        }
    }

    pub fn on_response(
        &mut self,
        token: RequestToken,
        result: Result<Vec<u8>, TransportError>,
        current_zoom: u8,
    ) -> ResponseOutcome {
        if !self.slot.settle(token) {
            debug!(token = token.0, "dropping response of superseded request");
            return ResponseOutcome::Superseded;
        }
        self.state = self.settled_state();

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(token = token.0, "building load failed: {err}");
                return ResponseOutcome::Failed;
            }
        };
        match LoadResponse::from_slice(&bytes) {
            Ok(response) => self.accept_response(response, current_zoom),
            Err(err) => {
                warn!(token = token.0, "{err}");
                ResponseOutcome::Failed
            }
        }
    }

    /// Installs a decoded response if it matches `current_zoom`, tagging buildings
    /// not present in the previous dataset as new.
    pub fn accept_response(&mut self, response: LoadResponse, current_zoom: u8) -> ResponseOutcome {
        if response.meta.z != current_zoom {
            debug!(
                echoed = response.meta.z,
                current = current_zoom,
                "dropping stale building response"
            );
            return ResponseOutcome::Stale {
                echoed: response.meta.z,
                current: current_zoom,
            };
        }

        let next_meta = ViewportMeta::from(&response.meta);
        let known = self.known_keys(&next_meta);

        let mut data = self.lod.from_response(&response.data, response.meta.z);
        let mut new = 0;
        for building in data.iter_mut() {
            building.is_new = building
                .first_vertex()
                .is_some_and(|key| !known.contains(&key));
            if building.is_new {
                new += 1;
            }
        }

        let buildings = data.len();
        self.raw = None;
        self.meta = Some(next_meta);
        self.data = Some(data);
        self.state = LoadState::Loaded;
        debug!(buildings, new, zoom = current_zoom, "building response accepted");
        ResponseOutcome::Accepted { buildings, new }
    }

    /// First-vertex keys of the displayed buildings, shifted into `next`'s pixel frame.
    fn known_keys(&self, next: &ViewportMeta) -> HashSet<Pixel> {
        match (&self.meta, &self.data) {
            (Some(prev), Some(data)) if prev.zoom == next.zoom => {
                let Some(offset) = prev.origin.checked_sub(next.origin) else {
                    return HashSet::new();
                };
                data.iter()
                    .filter_map(ScaledBuilding::first_vertex)
                    .filter_map(|p| p.checked_add(offset))
                    .collect()
            }
            _ => HashSet::new(),
        }
    }

    fn settled_state(&self) -> LoadState {
        if self.has_dataset() {
            LoadState::Loaded
        } else {
            LoadState::Idle
        }
    }
}
