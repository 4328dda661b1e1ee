/// Identifies one issued load request.
///
/// Tokens are handed out by the [`Transport`](crate::Transport) and travel back
/// with the response, so a response can be matched against the request that is
/// still current.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);
