//! Routing module
//!
//! Provides prefix-grouped routing:
//! - Prefix groups (`/users` + `/{user_id}`)
//! - Pattern segments with named parameters
//! - 404/405 fallbacks

mod matcher;
mod router;

pub use matcher::PathParams;
pub use router::Router;
