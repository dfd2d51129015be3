use http::{Extensions, HeaderMap};
use pingora::prelude::Session;
use pingora::protocols::l4::socket::SocketAddr as PingoraSocketAddr;
use std::net::IpAddr;

/// Request context passed through the device pipeline
#[derive(Debug, Default)]
pub struct RequestCtx {
    /// Lifecycle flag to determine if the context has already been hydrated from a session.
    pub hydrated: bool,

    /// Request headers as received from the client.
    pub headers: HeaderMap,

    /// Remote IP of the TCP connection, if the transport has one.
    pub peer_ip: Option<IpAddr>,

    /// Request-scoped typed extensions (NOT forwarded, NOT logged by default).
    pub extensions: Extensions,
}

/// Hydration API
impl RequestCtx {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(headers: HeaderMap, peer_ip: Option<IpAddr>) -> Self {
        let mut ctx = Self::empty();
        ctx.hydrate(&headers, peer_ip);
        ctx
    }

    /// Create a boundary to decouple session from logic.
    pub fn hydrate_from_session(&mut self, session: &Session) {
        // Unix sockets carry no client address.
        let peer_ip = match session.client_addr() {
            Some(PingoraSocketAddr::Inet(addr)) => Some(addr.ip()),
            _ => None,
        };

        self.hydrate(&session.req_header().headers, peer_ip);
    }

    pub(crate) fn hydrate(&mut self, headers: &HeaderMap, peer_ip: Option<IpAddr>) {
        debug_assert!(!self.hydrated, "Already hydrated, cannot hydrate again");

        self.headers = headers.clone();
        self.peer_ip = peer_ip;
        self.hydrated = true;
    }
}
