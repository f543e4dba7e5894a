use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, User};
use crate::error::StoreError;

/// Find a user by exact login.
pub async fn find_by_login(db: &PgPool, login: &str) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, login, email, password_hash, created_at
        FROM users
        WHERE login = $1
        LIMIT 1
        "#,
    )
    .bind(login)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Create a new user. A clash on login or email comes back as `StoreError::Duplicate`.
pub async fn create(db: &PgPool, new: &NewUser) -> Result<User, StoreError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (login, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, login, email, password_hash, created_at
        "#,
    )
    .bind(&new.login)
    .bind(&new.email)
    .bind(&new.password_hash)
    .fetch_one(db)
    .await
    .map_err(StoreError::classify)
}
