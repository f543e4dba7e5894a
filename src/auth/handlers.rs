use axum::{extract::State, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest, UserPayload},
        extractors::SessionToken,
        password::{hash_password, verify_against_dummy, verify_password},
        repo_types::NewUser,
    },
    config::SessionConfig,
    error::ApiError,
    response::{ApiJson, Empty, Envelope, JsonBody},
    routes::method_not_allowed,
    sessions::SessionUser,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login).fallback(method_not_allowed))
        .route("/api/register", post(register).fallback(method_not_allowed))
        .route("/api/logout", post(logout).fallback(method_not_allowed))
}

fn session_cookie(cfg: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((cfg.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cfg.secure_cookie)
        .max_age(time::Duration::minutes(cfg.ttl_minutes))
        .build()
}

fn expired_cookie(cfg: &SessionConfig) -> Cookie<'static> {
    Cookie::build((cfg.cookie_name.clone(), "")).path("/").build()
}

#[instrument(skip_all, fields(login = %payload.login))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<(CookieJar, ApiJson<UserPayload>), ApiError> {
    let user = state.catalog.find_user_by_login(&payload.login).await?;

    let verified = match &user {
        Some(u) => verify_password(&payload.password, &u.password_hash).unwrap_or_else(|e| {
            error!(error = %e, user_id = u.id, "stored hash unreadable");
            false
        }),
        None => verify_against_dummy(&payload.password),
    };

    let user = match user {
        Some(u) if verified => u,
        Some(u) => {
            warn!(user_id = u.id, "login invalid password");
            return Err(ApiError::AuthenticationFailed);
        }
        None => {
            warn!("login unknown user");
            return Err(ApiError::AuthenticationFailed);
        }
    };

    let token = state
        .sessions
        .create(SessionUser { user_id: user.id, login: user.login.clone() })
        .await?;

    info!(user_id = user.id, "user logged in");
    let body = Envelope::ok(UserPayload {
        user: PublicUser { id: user.id, login: user.login },
    })
    .with_message("Login successful");
    Ok((jar.add(session_cookie(&state.config.session, token)), Json(body)))
}

/// Registration performs no validation beyond what the store enforces
/// (uniqueness of login and email).
#[instrument(skip_all, fields(login = %payload.login))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<ApiJson<Empty>, ApiError> {
    let password_hash =
        hash_password(&payload.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = state
        .catalog
        .create_user(NewUser { login: payload.login, email: payload.email, password_hash })
        .await
        .map_err(|e| {
            let e = ApiError::from(e);
            if matches!(e, ApiError::AlreadyExists) {
                warn!("login or email already registered");
            }
            e
        })?;

    info!(user_id = user.id, "user registered");
    Ok(Json(Envelope::message("Registration successful")))
}

/// Always succeeds, with or without a session.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    SessionToken(token): SessionToken,
) -> Result<(CookieJar, ApiJson<Empty>), ApiError> {
    if let Some(token) = token {
        if let Err(e) = state.sessions.destroy(&token).await {
            error!(error = %e, "session destroy failed");
        }
    }
    let jar = jar.remove(expired_cookie(&state.config.session));
    Ok((jar, Json(Envelope::message("Logged out"))))
}
