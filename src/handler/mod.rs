//! Request handler module
//!
//! Handlers receive the request context plus the parameters captured by the
//! router and always produce a response; failures are mapped to status codes
//! inside the handler.

pub mod profile;

pub use profile::ProfileHandler;

use async_trait::async_trait;

use crate::http::{HttpResponse, RequestContext};
use crate::routing::PathParams;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &RequestContext, params: &PathParams) -> HttpResponse;
}
