use std::collections::HashMap;

use runtime::{TickHandle, Ticker};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::log;

struct Running {
    interval_id: Option<i32>,
    callback: Closure<dyn FnMut()>,
}

/// `setInterval`-based ticker.
///
/// A stopped callback may still be on the stack (the fade stops its own tick),
/// so it is parked and only dropped on the next `start`.
#[derive(Default)]
pub struct IntervalTicker {
    next: u64,
    running: HashMap<TickHandle, Running>,
    retired: Vec<Closure<dyn FnMut()>>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self, period_ms: u32) -> TickHandle {
        self.retired.clear();
        self.next += 1;
        let handle = TickHandle(self.next);

        let callback = Closure::<dyn FnMut()>::new(move || crate::deliver_tick(handle));
        let interval_id = web_sys::window().and_then(|w| {
            w.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref::<js_sys::Function>(),
                period_ms as i32,
            )
            .map_err(|e| log(&format!("setInterval failed: {e:?}")))
            .ok()
        });

        self.running.insert(
            handle,
            Running {
                interval_id,
                callback,
            },
        );
        handle
    }

    fn stop(&mut self, handle: TickHandle) {
        let Some(running) = self.running.remove(&handle) else {
            return;
        };
        if let (Some(window), Some(id)) = (web_sys::window(), running.interval_id) {
            window.clear_interval_with_handle(id);
        }
        self.retired.push(running.callback);
    }
}
