use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    movies::dto::{AddMovieRequest, MovieQuery, MoviePayload, MoviesPayload},
    response::{ApiJson, Envelope, JsonBody, QueryParams},
    routes::method_not_allowed,
    state::AppState,
};

pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/movies",
            get(list_movies)
                .post(add_movie)
                .fallback(method_not_allowed),
        )
        .route("/api/movie", get(get_movie).fallback(method_not_allowed))
        .route(
            "/api/user-movies",
            get(user_movies).fallback(method_not_allowed),
        )
}

#[instrument(skip(state))]
pub async fn list_movies(
    State(state): State<AppState>,
) -> Result<ApiJson<MoviesPayload>, ApiError> {
    let movies = state.catalog.list_movies().await?;
    Ok(Json(Envelope::ok(MoviesPayload { movies })))
}

#[instrument(skip(state, payload), fields(user_id = user.user_id))]
pub async fn add_movie(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<AddMovieRequest>,
) -> Result<ApiJson<MoviePayload>, ApiError> {
    let movie = state
        .catalog
        .insert_movie(user.user_id, payload.into())
        .await?;
    info!(movie_id = movie.id, "movie added");
    Ok(Json(
        Envelope::ok(MoviePayload { movie }).with_message("Movie added"),
    ))
}

#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<MovieQuery>,
) -> Result<ApiJson<MoviePayload>, ApiError> {
    let id = query
        .movie_id()
        .ok_or_else(|| ApiError::BadRequest("Missing or invalid movie id".into()))?;
    let movie = state
        .catalog
        .find_movie(id)
        .await?
        .ok_or(ApiError::NotFound("Movie not found"))?;
    Ok(Json(Envelope::ok(MoviePayload { movie })))
}

/// Requires a session, same as adding a movie.
#[instrument(skip(state), fields(user_id = user.user_id))]
pub async fn user_movies(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ApiJson<MoviesPayload>, ApiError> {
    let movies = state.catalog.list_movies_by_owner(user.user_id).await?;
    Ok(Json(Envelope::ok(MoviesPayload { movies })))
}
