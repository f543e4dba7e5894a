//! Server-side sessions: an opaque token mapped to `{user_id, login}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::StoreError;

mod memory;
mod pg;

pub use memory::MemorySessionStore;
pub use pg::PgSessionStore;

/// Identity a session token resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionUser {
    pub user_id: i64,
    pub login: String,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Starts a session and returns its token. Expired sessions are swept here.
    async fn create(&self, user: SessionUser) -> Result<String, StoreError>;
    /// Resolves a live (unexpired) token.
    async fn lookup(&self, token: &str) -> Result<Option<SessionUser>, StoreError>;
    /// Ends a session. Unknown tokens are not an error.
    async fn destroy(&self, token: &str) -> Result<(), StoreError>;
    /// Drops expired sessions, returning how many went.
    async fn purge_expired(&self) -> Result<u64, StoreError>;
}

pub(crate) fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}
