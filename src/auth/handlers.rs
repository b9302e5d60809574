use axum::{
    extract::{FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        cookie,
        dto::{LoginRequest, MessageResponse, PublicUser, RegisterRequest, RegisterResponse},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{is_unique_violation, User},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", get(get_user))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        warn!("register with missing fields");
        return Err(ApiError::Validation("all fields required".into()));
    }
    if !is_valid_email(&email) {
        warn!(%email, "register with invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }
    if password.len() < 6 {
        warn!("register with short password");
        return Err(ApiError::Validation(
            "password must be at least 6 characters".into(),
        ));
    }

    // Friendly pre-check; the unique index below is what actually holds under
    // concurrent registration.
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }

    let hash = hash_password(password)?;

    let user = User::create(&state.db, name, &email, &hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Conflict("email already registered".into())
            } else {
                e.into()
            }
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    let password = payload.password.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("email and password required".into()));
    }

    // Unknown email and wrong password produce the same answer.
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!(%email, "login unknown email");
            return Err(ApiError::Auth("invalid credentials".into()));
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Auth("invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        cookie::session_cookie(&token, keys.ttl),
    );

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        headers,
        Json(MessageResponse {
            message: "login successful".into(),
        }),
    ))
}

/// Clears the cookie. Stateless sessions: a token copied before logout stays
/// valid until its natural expiry.
#[instrument]
pub async fn logout() -> (HeaderMap, Json<MessageResponse>) {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        cookie::clear_session_cookie(),
    );
    (
        headers,
        Json(MessageResponse {
            message: "logged out".into(),
        }),
    )
}

#[instrument(skip(user))]
pub async fn get_user(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}
