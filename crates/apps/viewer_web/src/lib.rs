use console_error_panic_hook::set_once;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use formats::CoordOrder;
use foundation::math::Pixel;
use layers::{BuildingsOverlay, OverlayConfig, StyleOptions};
use runtime::{StaticHost, TickHandle};
use streaming::{RequestToken, TransportError};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

mod canvas;
mod fetch;
mod interval;

use canvas::CanvasSurface;
use fetch::FetchTransport;
use interval::IntervalTicker;

type WebOverlay = BuildingsOverlay<CanvasSurface, FetchTransport, IntervalTicker>;

thread_local! {
    static OVERLAY: RefCell<Option<WebOverlay>> = const { RefCell::new(None) };
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Runs `f` against the attached overlay; a no-op before `attach`.
fn with_overlay<R>(f: impl FnOnce(&mut WebOverlay) -> R) -> Option<R> {
    OVERLAY.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            log("buildings overlay busy; call dropped");
            return None;
        };
        slot.as_mut().map(f)
    })
}

fn deliver_response(token: RequestToken, result: Result<Vec<u8>, TransportError>) {
    with_overlay(|overlay| {
        overlay.transport_mut().complete(token);
        overlay.on_response(token, result);
    });
}

fn deliver_tick(handle: TickHandle) {
    with_overlay(|overlay| overlay.on_tick(handle));
}

fn context_2d(canvas_id: &str) -> Result<CanvasRenderingContext2d, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into()?;
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Creates the overlay on `canvas_id` and draws the current view.
///
/// `center_x`/`center_y` are world pixels at `zoom`. `config_json` optionally
/// overrides overlay tunables.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn attach(
    canvas_id: &str,
    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    zoom: u8,
    max_zoom: Option<u8>,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => OverlayConfig::from_json_str(&json).map_err(js_err)?,
        None => OverlayConfig::default(),
    };
    let surface = CanvasSurface::new(context_2d(canvas_id)?);
    let mut overlay = BuildingsOverlay::new(config, surface, FetchTransport::new(), IntervalTicker::new())
        .map_err(js_err)?;

    overlay.attach(&StaticHost {
        width,
        height,
        center: Pixel::new(center_x, center_y),
        zoom,
        max_zoom,
    });
    OVERLAY.with(|cell| {
        cell.try_borrow_mut()
            .map(|mut slot| *slot = Some(overlay))
            .map_err(|_| JsValue::from_str("buildings overlay busy"))
    })
}

/// Loads buildings from a URL template with `{w}`, `{n}`, `{e}`, `{s}` and `{z}`.
#[wasm_bindgen]
pub fn load_data(url_template: &str) {
    with_overlay(|overlay| overlay.load_data(url_template));
}

/// Shows local GeoJSON; `None` clears the overlay.
#[wasm_bindgen]
pub fn set_data(geojson: Option<String>, lon_lat: bool) -> Result<(), JsValue> {
    let order = if lon_lat {
        CoordOrder::LonLat
    } else {
        CoordOrder::LatLon
    };
    let result = with_overlay(|overlay| match geojson.as_deref() {
        Some(payload) => overlay.set_data_str(payload, order).map_err(js_err),
        None => {
            overlay.set_data(None, order);
            Ok(())
        }
    });
    result.unwrap_or(Ok(()))
}

#[wasm_bindgen]
pub fn set_style(options_json: &str) -> Result<(), JsValue> {
    let options = StyleOptions::from_json_str(options_json).map_err(js_err)?;
    with_overlay(|overlay| overlay.set_style(&options).map_err(js_err)).unwrap_or(Ok(()))
}

#[wasm_bindgen]
pub fn render() {
    with_overlay(|overlay| overlay.render());
}

#[wasm_bindgen]
pub fn on_resize(width: u32, height: u32) {
    with_overlay(|overlay| overlay.on_resize(width, height));
}

#[wasm_bindgen]
pub fn on_move(center_x: i32, center_y: i32) {
    with_overlay(|overlay| overlay.on_move(Pixel::new(center_x, center_y)));
}

#[wasm_bindgen]
pub fn on_move_end(center_x: i32, center_y: i32) {
    with_overlay(|overlay| overlay.on_move_end(Pixel::new(center_x, center_y)));
}

#[wasm_bindgen]
pub fn on_zoom_start() {
    with_overlay(|overlay| overlay.on_zoom_start());
}

#[wasm_bindgen]
pub fn on_zoom_end(zoom: u8, center_x: i32, center_y: i32) {
    with_overlay(|overlay| overlay.on_zoom_end(zoom, Pixel::new(center_x, center_y)));
}
