//! User records and the directory used to look them up.

mod memory;

pub use memory::MemoryDirectory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::http::RequestContext;

/// Identifier of a user, as it appears in `/users/{user_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid user id: {0:?}")]
pub struct ParseUserIdError(String);

impl FromStr for UserId {
    type Err = ParseUserIdError;

    /// Accepts decimal digits with an optional leading `+`; rejects signs,
    /// whitespace and values that do not fit in 64 bits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self::new)
            .map_err(|_| ParseUserIdError(s.to_string()))
    }
}

/// A user's public profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Errors from the user directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("user {0} not found")]
    NotFound(UserId),

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of user profiles by identifier.
///
/// The request context is passed through untouched so implementations can
/// honour its deadline.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_by_id(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> Result<UserProfile, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ids() {
        assert_eq!("42".parse::<UserId>(), Ok(UserId::new(42)));
        assert_eq!("0".parse::<UserId>(), Ok(UserId::new(0)));
        assert_eq!("007".parse::<UserId>(), Ok(UserId::new(7)));
        assert_eq!("+5".parse::<UserId>(), Ok(UserId::new(5)));
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        for raw in ["", "abc", "-1", "4 2", " 42", "42abc", "1.5", "18446744073709551616"] {
            assert!(raw.parse::<UserId>().is_err(), "accepted {raw:?}");
        }
    }
}
