use std::collections::HashMap;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::debug;

use super::{new_token, SessionStore, SessionUser};
use crate::error::StoreError;

struct Entry {
    user: SessionUser,
    expires_at: OffsetDateTime,
}

/// Process-local session map. Sessions die with the process.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    /// Entries currently held, expired or not.
    pub async fn held(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user: SessionUser) -> Result<String, StoreError> {
        let token = new_token();
        let now = OffsetDateTime::now_utc();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        let user_id = user.user_id;
        entries.insert(token.clone(), Entry { user, expires_at: now + self.ttl });
        debug!(user_id = user_id, live = entries.len(), "session created");
        Ok(token)
    }

    async fn lookup(&self, token: &str) -> Result<Option<SessionUser>, StoreError> {
        let now = OffsetDateTime::now_utc();
        let mut entries = self.entries.write().await;
        match entries.get(token) {
            Some(e) if e.expires_at > now => Ok(Some(e.user.clone())),
            Some(_) => {
                entries.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn destroy(&self, token: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(token);
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let now = OffsetDateTime::now_utc();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> SessionUser {
        SessionUser { user_id: 1, login: "ann".into() }
    }

    #[tokio::test]
    async fn create_lookup_destroy() {
        let store = MemorySessionStore::new(Duration::minutes(5));
        let token = store.create(ann()).await.unwrap();
        assert_eq!(store.lookup(&token).await.unwrap(), Some(ann()));

        store.destroy(&token).await.unwrap();
        assert_eq!(store.lookup(&token).await.unwrap(), None);
        // destroying twice is fine
        store.destroy(&token).await.unwrap();
    }

    #[tokio::test]
    async fn tokens_are_distinct_per_login() {
        let store = MemorySessionStore::new(Duration::minutes(5));
        let a = store.create(ann()).await.unwrap();
        let b = store.create(ann()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn expired_sessions_do_not_resolve() {
        let store = MemorySessionStore::new(Duration::seconds(-1));
        let token = store.create(ann()).await.unwrap();
        assert_eq!(store.lookup(&token).await.unwrap(), None);
        assert_eq!(store.purge_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn purge_drops_only_expired_entries() {
        let store = MemorySessionStore::new(Duration::minutes(5));
        let live = store.create(ann()).await.unwrap();
        store.entries.write().await.insert(
            "stale".into(),
            Entry { user: ann(), expires_at: OffsetDateTime::now_utc() - Duration::seconds(1) },
        );
        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.lookup(&live).await.unwrap(), Some(ann()));
    }

    #[tokio::test]
    async fn expired_entries_are_not_kept_around() {
        let store = MemorySessionStore::new(Duration::seconds(-1));
        for _ in 0..100 {
            let token = store.create(ann()).await.unwrap();
            assert_eq!(store.lookup(&token).await.unwrap(), None);
        }
        assert_eq!(store.held().await, 0);

        // no lookup at all: the next login sweeps what is left
        store.create(ann()).await.unwrap();
        store.create(ann()).await.unwrap();
        assert_eq!(store.held().await, 1);
    }
}
