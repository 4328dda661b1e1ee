use std::collections::HashMap;

use gloo_net::http::Request;
use streaming::{RequestToken, Transport, TransportError};
use wasm_bindgen_futures::spawn_local;
use web_sys::AbortController;

use crate::log;

/// `fetch`-based transport; responses are handed back through the overlay state.
#[derive(Default)]
pub struct FetchTransport {
    next: u64,
    pending: HashMap<RequestToken, AbortController>,
}

impl FetchTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets a request once its response has been delivered.
    pub fn complete(&mut self, token: RequestToken) {
        self.pending.remove(&token);
    }
}

impl Transport for FetchTransport {
    fn get(&mut self, url: &str) -> RequestToken {
        self.next += 1;
        let token = RequestToken(self.next);

        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(|c| c.signal());
        if let Some(controller) = controller {
            self.pending.insert(token, controller);
        }

        let url = url.to_string();
        spawn_local(async move {
            let result = fetch_bytes(&url, signal).await;
            crate::deliver_response(token, result);
        });
        token
    }

    fn abort(&mut self, token: RequestToken) {
        if let Some(controller) = self.pending.remove(&token) {
            controller.abort();
        }
    }
}

async fn fetch_bytes(
    url: &str,
    signal: Option<web_sys::AbortSignal>,
) -> Result<Vec<u8>, TransportError> {
    let resp = Request::get(url)
        .abort_signal(signal.as_ref())
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    if !resp.ok() {
        return Err(TransportError::Status(resp.status()));
    }
    resp.binary().await.map_err(|e| {
        log(&format!("reading building response failed: {e}"));
        TransportError::Network(e.to_string())
    })
}
