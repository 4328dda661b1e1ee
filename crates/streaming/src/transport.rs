use crate::request::RequestToken;

/// GET-capable transport supplied by the host.
///
/// `get` starts a request and returns its token right away; the host later
/// delivers the outcome together with that token.
pub trait Transport {
    fn get(&mut self, url: &str) -> RequestToken;

    /// Best-effort abort. A response for an aborted token may still arrive.
    fn abort(&mut self, token: RequestToken);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Network(String),
    Status(u16),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Status(code) => write!(f, "unexpected HTTP status {code}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Transport that only records what was asked of it.
///
/// Responses are fed back by the caller, which makes request ordering fully
/// deterministic in tests and in hosts without real networking.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    next: u64,
    requests: Vec<(RequestToken, String)>,
    aborted: Vec<RequestToken>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[(RequestToken, String)] {
        &self.requests
    }

    pub fn last_request(&self) -> Option<&(RequestToken, String)> {
        self.requests.last()
    }

    pub fn aborted(&self) -> &[RequestToken] {
        &self.aborted
    }
}

impl Transport for RecordingTransport {
    fn get(&mut self, url: &str) -> RequestToken {
        self.next += 1;
        let token = RequestToken(self.next);
        self.requests.push((token, url.to_string()));
        token
    }

    fn abort(&mut self, token: RequestToken) {
        self.aborted.push(token);
    }
}
