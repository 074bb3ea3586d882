/// Authentication middleware for Axum
///
/// The guard validates the `Authorization: Bearer <token>` header on every
/// protected route, then exposes the caller's identity to handlers through
/// an [`AuthContext`] request extension. Every failure mode (missing header,
/// malformed header, expired token, bad signature) produces the same
/// `401 Authentication required.` response; the concrete cause is only
/// logged, so callers cannot probe which check failed.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use memora_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn protected_handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(middleware::from_fn(create_jwt_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, JwtError};

/// Authentication context added to request extensions
///
/// Handlers behind the guard extract it with Axum's `Extension` extractor
/// and treat `user_id` as the acting identity for every ownership check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id (the token's subject)
    pub user_id: i64,
}

impl AuthContext {
    /// Creates auth context from a validated token subject
    pub fn from_subject(user_id: i64) -> Self {
        Self { user_id }
    }
}

/// Error type for authentication middleware
///
/// The variants record why authentication failed for logging; the response
/// is identical for all of them.
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer credential
    InvalidFormat,

    /// Token validation failed (expired, bad signature, bad format)
    InvalidToken(JwtError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": "Authentication required.",
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// JWT authentication middleware
///
/// Validates the bearer token and either forwards the request with an
/// [`AuthContext`] extension or short-circuits with 401. The wrapped handler
/// is never invoked on failure.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!("Rejected request without authorization header");
            AuthError::MissingCredentials
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!("Rejected authorization header that is not a bearer credential");
        AuthError::InvalidFormat
    })?;

    let claims = validate_token(token, &secret).map_err(|e| {
        match &e {
            JwtError::Expired => tracing::debug!("Rejected expired token"),
            other => tracing::debug!(error = %other, "Rejected invalid token"),
        }
        AuthError::InvalidToken(e)
    })?;

    req.extensions_mut()
        .insert(AuthContext::from_subject(claims.sub));

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Captures the secret so the result can be handed to
/// `axum::middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
