//! Authentication middleware
//!
//! Axum middleware for JWT authentication.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Whether a request may pass without authentication.
///
/// - CORS preflight and non-`/api/` paths
/// - health, login and registration
/// - anonymous menu browsing (GET only)
fn is_public(req: &Request) -> bool {
    if req.method() == http::Method::OPTIONS {
        return true;
    }
    let path = req.uri().path();
    if !path.starts_with("/api/") {
        return true;
    }
    if path == "/api/health" || path == "/api/auth/login" {
        return true;
    }
    if path == "/api/users" && req.method() == http::Method::POST {
        return true;
    }
    if req.method() == http::Method::GET
        && (path.starts_with("/api/menu-items") || path.starts_with("/api/categories"))
    {
        return true;
    }
    false
}

/// Authentication middleware — requires a logged-in user
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`, then
/// injects [`CurrentUser`] into the request extensions.
///
/// # Errors
///
/// | Failure | Status |
/// |---------|--------|
/// | No Authorization header | 401 Unauthorized |
/// | Token expired | 401 TokenExpired |
/// | Invalid token | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(&req) {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {e}")))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
