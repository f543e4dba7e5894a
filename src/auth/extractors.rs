use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use crate::{error::ApiError, sessions::SessionUser, state::AppState};

/// Session token carried by the request, if any: the session cookie first,
/// then `Authorization: Bearer <token>` for non-browser clients.
pub struct SessionToken(pub Option<String>);

#[async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let from_cookie = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        let token = from_cookie.or_else(|| {
            parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
                .map(str::to_string)
        });

        Ok(SessionToken(token))
    }
}

/// The signed-in user. Rejects with 401 before the handler runs when there
/// is no live session.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;
        let token = token.ok_or(ApiError::AuthorizationRequired)?;

        match state.sessions.lookup(&token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!("unknown or expired session token");
                Err(ApiError::AuthorizationRequired)
            }
        }
    }
}
