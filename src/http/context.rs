//! Per-request context handed from the connection layer to handlers and
//! on to downstream collaborators.

use hyper::Method;
use std::net::SocketAddr;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub peer_addr: Option<SocketAddr>,
    /// Point after which the connection will be dropped, if bounded
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }
}
