//! In-memory user directory, seeded from a TOML data file.
//!
//! ```toml
//! [[users]]
//! id = 42
//! first_name = "Ada"
//! last_name = "Lovelace"
//! interests = ["mathematics", "engines"]
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tokio::time::Instant;

use super::{DirectoryError, UserDirectory, UserId, UserProfile};
use crate::http::RequestContext;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<UserProfile>,
}

/// Read-only directory holding every profile in memory
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: HashMap<UserId, UserProfile>,
}

impl MemoryDirectory {
    pub fn from_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        Self {
            users: profiles.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// Load every `[[users]]` record from a TOML file
    pub async fn load(path: &Path) -> Result<Self, DirectoryError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            DirectoryError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
            .map_err(|e| DirectoryError::Unavailable(format!("{}: {e}", path.display())))
    }

    fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        let seed: SeedFile = toml::from_str(raw)?;
        Ok(Self::from_profiles(seed.users))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn get_by_id(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> Result<UserProfile, DirectoryError> {
        if ctx.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(DirectoryError::DeadlineExceeded);
        }
        self.users
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const SEED: &str = r#"
[[users]]
id = 42
first_name = "Ada"
last_name = "Lovelace"
age = 36
city = "London"
interests = ["mathematics", "engines"]

[[users]]
id = 7
first_name = "Alan"
last_name = "Turing"
"#;

    #[tokio::test]
    async fn test_lookup_known_and_unknown() {
        let directory = MemoryDirectory::parse(SEED).unwrap();
        assert_eq!(directory.len(), 2);

        let ctx = RequestContext::default();
        let ada = directory.get_by_id(&ctx, UserId::new(42)).await.unwrap();
        assert_eq!(ada.first_name, "Ada");
        assert_eq!(ada.interests, vec!["mathematics", "engines"]);

        let alan = directory.get_by_id(&ctx, UserId::new(7)).await.unwrap();
        assert_eq!(alan.city, None);
        assert!(alan.interests.is_empty());

        let missing = directory.get_by_id(&ctx, UserId::new(1)).await;
        assert!(matches!(missing, Err(DirectoryError::NotFound(id)) if id == UserId::new(1)));
    }

    #[tokio::test]
    async fn test_expired_deadline_is_honoured() {
        let directory = MemoryDirectory::parse(SEED).unwrap();
        let ctx = RequestContext {
            deadline: Some(Instant::now() - Duration::from_millis(1)),
            ..RequestContext::default()
        };
        let result = directory.get_by_id(&ctx, UserId::new(42)).await;
        assert!(matches!(result, Err(DirectoryError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let directory = MemoryDirectory::load(file.path()).await.unwrap();
        assert_eq!(directory.len(), 2);

        let missing = MemoryDirectory::load(Path::new("/no/such/users.toml")).await;
        assert!(matches!(missing, Err(DirectoryError::Unavailable(_))));
    }

    #[test]
    fn test_malformed_seed_is_rejected() {
        assert!(MemoryDirectory::parse("[[users]]\nid = \"abc\"").is_err());
        assert!(MemoryDirectory::parse("").unwrap().is_empty());
    }
}
