use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::JsonObjectOrEmpty;
use crate::models::auth::SessionResponse;
use crate::state::AppState;
use crate::utils::{cookie, jwt};

/// Issue a session token for whatever identity the client posts.
///
/// No credential is checked here; the token only proves the payload was signed by this server.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    operation_id = "issueToken",
    summary = "Issue a session cookie",
    description = "Signs the posted JSON object (typically `{\"email\": ...}`) into a token and sets it as the HTTP-only `token` cookie. An empty body signs `{}`; a non-string `email` is signed as plain data and grants no identity.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Cookie set", body = SessionResponse),
        (status = 400, description = "Body is not a JSON object (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload))]
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonObjectOrEmpty(payload): JsonObjectOrEmpty,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    let ttl_days = state.config.auth.token_ttl_days;
    let claims = jwt::Claims::from_payload(payload, ttl_days)
        .map_err(|e| AppError::Internal(format!("JWT claims error: {}", e)))?;
    tracing::info!(email = ?claims.email, "Issuing session token");

    let token = jwt::sign(&claims, &state.config.auth.jwt_secret)
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    let jar = jar.add(cookie::session(token, state.config.environment, ttl_days));
    Ok((jar, Json(SessionResponse { success: true })))
}

/// Clear the session cookie. Tokens are stateless, so nothing is revoked server-side.
#[utoipa::path(
    get,
    path = "/logout",
    tag = "Auth",
    operation_id = "logout",
    summary = "Clear the session cookie",
    responses(
        (status = 200, description = "Cookie cleared", body = SessionResponse),
    ),
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    let jar = jar.add(cookie::cleared(state.config.environment));
    (jar, Json(SessionResponse { success: true }))
}
