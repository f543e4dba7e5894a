use async_trait::async_trait;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::{new_token, SessionStore, SessionUser};
use crate::error::StoreError;

/// Sessions persisted in the `sessions` table, so they survive restarts and
/// are shared between server instances.
#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
    ttl: Duration,
}

impl PgSessionStore {
    pub fn new(db: PgPool, ttl: Duration) -> Self {
        Self { db, ttl }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, user: SessionUser) -> Result<String, StoreError> {
        let token = new_token();
        let expires_at = OffsetDateTime::now_utc() + self.ttl;
        let swept = self.purge_expired().await?;
        if swept > 0 {
            debug!(swept, "expired sessions removed");
        }
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, login, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token)
        .bind(user.user_id)
        .bind(&user.login)
        .bind(expires_at)
        .execute(&self.db)
        .await?;
        debug!(user_id = user.user_id, "session created");
        Ok(token)
    }

    async fn lookup(&self, token: &str) -> Result<Option<SessionUser>, StoreError> {
        let user = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT user_id, login
            FROM sessions
            WHERE token = $1 AND expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn destroy(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, StoreError> {
        let done = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.db)
            .await?;
        Ok(done.rows_affected())
    }
}
