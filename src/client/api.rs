use axum::http::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    auth::dto::{LoginRequest, PublicUser, RegisterRequest, UserPayload},
    client::transport::Transport,
    movies::{
        dto::{AddMovieRequest, MoviePayload, MoviesPayload},
        repo_types::Movie,
    },
    response::{Empty, Envelope},
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The dispatcher answered with `success: false`.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Rejected { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}

/// Typed calls for every dispatcher endpoint.
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn call<P: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Envelope<P>, ClientError> {
        debug!(%method, path, "api call");
        let (status, value) = self.transport.send(method, path, body).await?;

        let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
        if !success {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Request failed")
                .to_string();
            return Err(ClientError::Rejected { status, message });
        }
        serde_json::from_value(value)
            .map_err(|e| ClientError::Transport(anyhow::anyhow!("unexpected response: {e}")))
    }

    fn json(body: &impl Serialize) -> Result<Option<Value>, ClientError> {
        serde_json::to_value(body)
            .map(Some)
            .map_err(|e| ClientError::Transport(e.into()))
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<PublicUser, ClientError> {
        let env: Envelope<UserPayload> =
            self.call(Method::POST, "/api/login", Self::json(req)?).await?;
        Ok(env.payload.user)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<(), ClientError> {
        self.call::<Empty>(Method::POST, "/api/register", Self::json(req)?)
            .await
            .map(|_| ())
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.call::<Empty>(Method::POST, "/api/logout", None)
            .await
            .map(|_| ())
    }

    pub async fn movies(&self) -> Result<Vec<Movie>, ClientError> {
        let env: Envelope<MoviesPayload> = self.call(Method::GET, "/api/movies", None).await?;
        Ok(env.payload.movies)
    }

    pub async fn movie(&self, id: i64) -> Result<Movie, ClientError> {
        let path = format!("/api/movie?id={id}");
        let env: Envelope<MoviePayload> = self.call(Method::GET, &path, None).await?;
        Ok(env.payload.movie)
    }

    pub async fn user_movies(&self) -> Result<Vec<Movie>, ClientError> {
        let env: Envelope<MoviesPayload> =
            self.call(Method::GET, "/api/user-movies", None).await?;
        Ok(env.payload.movies)
    }

    pub async fn add_movie(&self, req: &AddMovieRequest) -> Result<Movie, ClientError> {
        let env: Envelope<MoviePayload> =
            self.call(Method::POST, "/api/movies", Self::json(req)?).await?;
        Ok(env.payload.movie)
    }
}
