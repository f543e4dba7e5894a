use sqlx::PgPool;

use crate::error::StoreError;
use crate::movies::repo_types::{Movie, NewMovie};

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT m.id, m.title, m.description, m.image_path, m.user_id, m.created_at,
           u.login AS author
    FROM movies m
    LEFT JOIN users u ON u.id = m.user_id
"#;

pub async fn list_all(db: &PgPool) -> Result<Vec<Movie>, StoreError> {
    let sql = format!("{SELECT_WITH_AUTHOR} ORDER BY m.created_at DESC, m.id DESC");
    let rows = sqlx::query_as::<_, Movie>(&sql).fetch_all(db).await?;
    Ok(rows)
}

pub async fn list_by_owner(db: &PgPool, user_id: i64) -> Result<Vec<Movie>, StoreError> {
    let sql = format!(
        "{SELECT_WITH_AUTHOR} WHERE m.user_id = $1 ORDER BY m.created_at DESC, m.id DESC"
    );
    let rows = sqlx::query_as::<_, Movie>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, movie_id: i64) -> Result<Option<Movie>, StoreError> {
    let sql = format!("{SELECT_WITH_AUTHOR} WHERE m.id = $1");
    let row = sqlx::query_as::<_, Movie>(&sql)
        .bind(movie_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn insert(db: &PgPool, owner: i64, new: &NewMovie) -> Result<Movie, StoreError> {
    let row = sqlx::query_as::<_, Movie>(
        r#"
        WITH inserted AS (
            INSERT INTO movies (title, description, image_path, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, image_path, user_id, created_at
        )
        SELECT i.id, i.title, i.description, i.image_path, i.user_id, i.created_at,
               u.login AS author
        FROM inserted i
        LEFT JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.image_path)
    .bind(owner)
    .fetch_one(db)
    .await
    .map_err(StoreError::classify)?;
    Ok(row)
}
