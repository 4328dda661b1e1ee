use tracing::debug;

use crate::request::RequestToken;
use crate::transport::Transport;

/// Holds at most one in-flight request.
///
/// Issuing a new request aborts and forgets the previous one, so only the most
/// recently issued token is ever accepted back.
#[derive(Debug, Default)]
pub struct RequestSlot {
    current: Option<RequestToken>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn in_flight(&self) -> Option<RequestToken> {
        self.current
    }

    pub fn issue<T: Transport + ?Sized>(&mut self, transport: &mut T, url: &str) -> RequestToken {
        self.cancel(transport);
        let token = transport.get(url);
        debug!(token = token.0, url, "load request issued");
        self.current = Some(token);
        token
    }

    pub fn cancel<T: Transport + ?Sized>(&mut self, transport: &mut T) {
        if let Some(prev) = self.current.take() {
            debug!(token = prev.0, "load request superseded");
            transport.abort(prev);
        }
    }

    /// Consumes the slot if `token` is the current request.
    ///
    /// Returns `false` for tokens that were superseded or never issued.
    pub fn settle(&mut self, token: RequestToken) -> bool {
        if self.current == Some(token) {
            self.current = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RequestSlot;
    use crate::transport::RecordingTransport;

    #[test]
    fn new_request_supersedes_previous() {
        let mut t = RecordingTransport::new();
        let mut slot = RequestSlot::new();
        let a = slot.issue(&mut t, "a");
        let b = slot.issue(&mut t, "b");
        assert_eq!(t.aborted(), &[a]);
        assert_eq!(slot.in_flight(), Some(b));
        assert!(!slot.settle(a));
        assert!(slot.settle(b));
        assert_eq!(slot.in_flight(), None);
    }

    #[test]
    fn settle_is_single_use() {
        let mut t = RecordingTransport::new();
        let mut slot = RequestSlot::new();
        let a = slot.issue(&mut t, "a");
        assert!(slot.settle(a));
        assert!(!slot.settle(a));
    }

    #[test]
    fn cancel_aborts_in_flight() {
        let mut t = RecordingTransport::new();
        let mut slot = RequestSlot::new();
        let a = slot.issue(&mut t, "a");
        slot.cancel(&mut t);
        assert_eq!(t.aborted(), &[a]);
        assert!(!slot.settle(a));
    }
}
