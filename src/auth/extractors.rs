use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{
    auth::{cookie, jwt::JwtKeys, repo::User},
    error::ApiError,
    state::AppState,
};

/// Extracts the session token from the `token` cookie (or an
/// `Authorization: Bearer` header), verifies it, and resolves the embedded
/// user id against the store. A token whose user has disappeared is invalid.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::parse_cookie(&parts.headers, cookie::TOKEN_COOKIE)
            .or_else(|| {
                parts
                    .headers
                    .get(axum::http::header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .map(|t| t.to_string())
            })
            .ok_or_else(|| ApiError::Auth("unauthorized".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|_| {
            warn!("invalid or expired session token");
            ApiError::Auth("unauthorized".into())
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "session token for unknown user");
                ApiError::Auth("unauthorized".into())
            })?;

        Ok(AuthUser(user))
    }
}
