use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Authenticated caller extracted from the `token` cookie.
///
/// Add this as a handler parameter to require authentication. Ownership checks
/// happen via `require_email()` in the handler body.
#[derive(Debug)]
pub struct AuthUser {
    pub email: Option<String>,
    /// Remaining claims the client supplied when the token was issued.
    pub claims: Map<String, Value>,
}

impl AuthUser {
    /// Returns `Ok(())` if the token's email claim equals `email`, `Err(PermissionDenied)` otherwise.
    pub fn require_email(&self, email: &str) -> Result<(), AppError> {
        if self.email.as_deref() == Some(email) {
            Ok(())
        } else {
            tracing::warn!(
                token_email = self.email.as_deref().unwrap_or("<none>"),
                requested = email,
                "Email claim does not match requested resource"
            );
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::TokenMissing)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected session token: {}", e);
            AppError::TokenInvalid
        })?;

        Ok(AuthUser {
            email: claims.email,
            claims: claims.extra,
        })
    }
}
