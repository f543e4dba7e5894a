use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    auth::{
        self,
        repo_types::{NewUser, User},
    },
    config::AppConfig,
    error::StoreError,
    movies::{
        self,
        repo_types::{Movie, NewMovie},
    },
};

/// The data store behind the dispatcher: users and their movies.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    /// All movies, newest first, with author login.
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;
    async fn list_movies_by_owner(&self, user_id: i64) -> Result<Vec<Movie>, StoreError>;
    async fn find_movie(&self, movie_id: i64) -> Result<Option<Movie>, StoreError>;
    async fn insert_movie(&self, owner: i64, new: NewMovie) -> Result<Movie, StoreError>;
}

/// Lazily connected pool: a database outage surfaces per request, not at boot.
pub fn connect_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy(&config.database_url)?;
    Ok(pool)
}

#[derive(Clone)]
pub struct PgCatalog {
    db: PgPool,
}

impl PgCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        auth::repo::find_by_login(&self.db, login).await
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        auth::repo::create(&self.db, &new).await
    }

    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        movies::repo::list_all(&self.db).await
    }

    async fn list_movies_by_owner(&self, user_id: i64) -> Result<Vec<Movie>, StoreError> {
        movies::repo::list_by_owner(&self.db, user_id).await
    }

    async fn find_movie(&self, movie_id: i64) -> Result<Option<Movie>, StoreError> {
        movies::repo::find(&self.db, movie_id).await
    }

    async fn insert_movie(&self, owner: i64, new: NewMovie) -> Result<Movie, StoreError> {
        movies::repo::insert(&self.db, owner, &new).await
    }
}
