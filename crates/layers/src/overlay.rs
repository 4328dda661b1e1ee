use formats::{
    CoordOrder, FootprintError, RawBuilding, buildings_from_geojson_str, normalize_features,
};
use foundation::math::Pixel;
use render::{DrawingSurface, RenderFrame};
use runtime::{MapEvent, MapHost, TickHandle, Ticker};
use serde_json::Value;
use streaming::{RequestToken, Transport, TransportError};
use tracing::{debug, info, trace, warn};

use crate::config::{ConfigError, OverlayConfig};
use crate::controller::{ResponseOutcome, ViewportDataController, ZoomOutcome};
use crate::extrude::{Extruder, zoom_alpha};
use crate::fade::{FadeAnimator, TickOutcome};
use crate::layer::{Layer, LayerId};
use crate::symbology::{BuildingStyle, StyleError, StyleOptions};
use crate::viewport::Viewport;

/// Extruded buildings drawn over a slippy map.
///
/// The overlay owns its collaborators: a drawing surface, a transport for
/// loads and a ticker for the fade. The host forwards map events and delivers
/// transport responses and ticks back through [`on_response`](Self::on_response)
/// and [`on_tick`](Self::on_tick). Everything runs on one thread.
pub struct BuildingsOverlay<S, T, K> {
    id: LayerId,
    config: OverlayConfig,
    viewport: Viewport,
    controller: ViewportDataController,
    fade: FadeAnimator,
    extruder: Extruder,
    style: BuildingStyle,
    surface: S,
    transport: T,
    ticker: K,
}

impl<S, T, K> BuildingsOverlay<S, T, K>
where
    S: DrawingSurface,
    T: Transport,
    K: Ticker,
{
    pub fn new(config: OverlayConfig, surface: S, transport: T, ticker: K) -> Result<Self, ConfigError> {
        Self::with_id(LayerId::default(), config, surface, transport, ticker)
    }

    pub fn with_id(
        id: LayerId,
        config: OverlayConfig,
        surface: S,
        transport: T,
        ticker: K,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            id,
            controller: ViewportDataController::new(config.min_zoom, config.level_of_detail()),
            fade: FadeAnimator::new(config.fade_step, config.fade_period_ms),
            extruder: Extruder::new(config.camera_height),
            viewport: Viewport::default(),
            style: BuildingStyle::default(),
            config,
            surface,
            transport,
            ticker,
        })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn controller(&self) -> &ViewportDataController {
        &self.controller
    }

    pub fn fade(&self) -> &FadeAnimator {
        &self.fade
    }

    pub fn style(&self) -> &BuildingStyle {
        &self.style
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn ticker(&self) -> &K {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut K {
        &mut self.ticker
    }

    /// Takes the host's current geometry and zoom limit, then loads and draws.
    pub fn attach<H: MapHost + ?Sized>(&mut self, host: &H) {
        if let Some(max_zoom) = host.max_zoom() {
            if max_zoom >= self.config.min_zoom {
                self.config.max_zoom = max_zoom;
                self.controller.set_level_of_detail(self.config.level_of_detail());
            }
        }
        self.viewport = Viewport::from_host(host, false);
        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            zoom = self.viewport.zoom,
            "buildings overlay attached"
        );
        self.controller.request_load(&self.viewport, &mut self.transport);
        self.render();
    }

    /// Switches to server-backed data and loads the current view.
    pub fn load_data(&mut self, url_template: &str) -> Option<RequestToken> {
        self.controller.set_url_template(url_template);
        self.controller.request_load(&self.viewport, &mut self.transport)
    }

    /// Replaces the dataset with local features, or clears it with `None`.
    pub fn set_data(&mut self, features: Option<&Value>, order: CoordOrder) {
        let Some(features) = features else {
            self.controller.set_raw(None, self.viewport.zoom, &mut self.transport);
            self.fade.finish(&mut self.ticker, &mut []);
            self.render();
            return;
        };

        self.install_local(normalize_features(features, order));
    }

    pub fn set_data_str(&mut self, payload: &str, order: CoordOrder) -> Result<(), FootprintError> {
        self.install_local(buildings_from_geojson_str(payload, order)?);
        Ok(())
    }

    fn install_local(&mut self, raw: Vec<RawBuilding>) {
        debug!(buildings = raw.len(), "local building data set");
        self.controller
            .set_raw(Some(raw), self.viewport.zoom, &mut self.transport);
        self.fade.start(&mut self.ticker);
        self.render();
    }

    /// Applies style options; on error the previous style stays in effect.
    pub fn set_style(&mut self, options: &StyleOptions) -> Result<(), StyleError> {
        if let Err(err) = self.style.apply(options) {
            warn!("style rejected: {err}");
            return Err(err);
        }
        self.render();
        Ok(())
    }

    /// Builds the frame for the current state without touching the surface.
    pub fn build_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new();
        frame.clear(self.viewport.width, self.viewport.height);

        let vp = &self.viewport;
        if vp.is_zooming || vp.zoom < self.config.min_zoom {
            return frame;
        }
        let Some(meta) = self.controller.meta() else {
            return frame;
        };
        // Rescaled or reloaded data for the new zoom has not arrived yet.
        if meta.zoom != vp.zoom {
            return frame;
        }

        let alpha = zoom_alpha(
            vp.zoom,
            self.config.min_zoom,
            self.config.max_zoom,
            self.config.alpha_falloff,
        );
        let colors = self.style.frame_colors(alpha);
        self.extruder.draw(
            &mut frame,
            vp,
            meta,
            self.controller.buildings(),
            self.fade.factor(),
            &colors,
            self.style.stroke_roofs,
        );
        frame
    }

    pub fn render(&mut self) {
        let frame = self.build_frame();
        trace!(commands = frame.commands.len(), "buildings frame");
        frame.replay(&mut self.surface);
    }

    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::Resize { width, height } => self.on_resize(width, height),
            MapEvent::Move { center } => self.on_move(center),
            MapEvent::MoveEnd { center } => self.on_move_end(center),
            MapEvent::ZoomStart => self.on_zoom_start(),
            MapEvent::ZoomEnd { zoom, center } => self.on_zoom_end(zoom, center),
        }
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.render();
        self.controller.on_move_end(&self.viewport, &mut self.transport);
    }

    pub fn on_move(&mut self, center: Pixel) {
        self.viewport.center = center;
        self.render();
    }

    pub fn on_move_end(&mut self, center: Pixel) {
        self.viewport.center = center;
        self.render();
        self.controller.on_move_end(&self.viewport, &mut self.transport);
    }

    pub fn on_zoom_start(&mut self) {
        self.viewport.is_zooming = true;
        self.render();
    }

    pub fn on_zoom_end(&mut self, zoom: u8, center: Pixel) {
        self.viewport.zoom = zoom;
        self.viewport.center = center;
        self.viewport.is_zooming = false;

        match self.controller.on_zoom_end(&self.viewport, &mut self.transport) {
            ZoomOutcome::Rescaled => {
                self.fade
                    .finish(&mut self.ticker, self.controller.buildings_mut());
            }
            ZoomOutcome::Reloading(token) => {
                debug!(zoom, issued = token.is_some(), "zoom end without local data");
            }
        }
        self.render();
    }

    /// Delivers the outcome of a transport request.
    pub fn on_response(
        &mut self,
        token: RequestToken,
        result: Result<Vec<u8>, TransportError>,
    ) -> ResponseOutcome {
        let outcome = self.controller.on_response(token, result, self.viewport.zoom);
        if outcome.is_accepted() {
            self.fade.start(&mut self.ticker);
            self.render();
        }
        outcome
    }

    pub fn on_tick(&mut self, handle: TickHandle) -> TickOutcome {
        let outcome = self
            .fade
            .tick(handle, &mut self.ticker, self.controller.buildings_mut());
        if outcome != TickOutcome::Ignored {
            self.render();
        }
        outcome
    }
}

impl<S, T, K> Layer for BuildingsOverlay<S, T, K>
where
    S: DrawingSurface,
    T: Transport,
    K: Ticker,
{
    fn id(&self) -> LayerId {
        self.id
    }

    fn redraw(&mut self) {
        self.render();
    }

    fn on_map_event(&mut self, event: MapEvent) {
        self.handle_event(event);
    }
}
