/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use memora_shared::{
    auth::{
        jwt::{self, Claims},
        password,
    },
    models::user::{NewUser, User},
};
use serde::{Deserialize, Serialize};

/// Register request
///
/// Fields are optional so that absence and emptiness can share one
/// validation path.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Desired username (unique)
    pub username: Option<String>,

    /// Plaintext password (only its hash is stored)
    pub password: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Confirmation message
    pub message: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: Option<String>,

    /// Password
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token, valid for 24 hours
    pub token: String,

    /// Echo of the authenticated username
    pub username: String,
}

/// Treats missing and empty strings identically
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Register a new user
///
/// Creates a user account with an Argon2id password hash. No token is
/// issued; the client logs in afterwards.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "User registered successfully."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty username/password
/// - `409 Conflict`: Username already taken
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let (username, password) = match (required(req.username), required(req.password)) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            return Err(ApiError::BadRequest {
                code: "invalid_input",
                message: "Username and password are required.".to_string(),
            });
        }
    };

    // Pre-check for a clean conflict response; the UNIQUE constraint still
    // catches two registrations racing past this lookup
    if User::find_by_username(&state.db, &username).await?.is_some() {
        return Err(ApiError::Conflict("User already exists.".to_string()));
    }

    let password_hash = password::hash_password(&password)?;

    let user = User::create(
        &state.db,
        NewUser {
            username,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully.".to_string(),
        }),
    ))
}

/// Login endpoint
///
/// Verifies credentials and returns a signed token.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "username": "alice"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request` (`missing_credentials`): Missing or empty fields
/// - `401 Unauthorized` (`user_not_found` / `invalid_password`): Bad
///   credentials; both carry the same message so callers cannot probe
///   which part was wrong
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (username, password) = match (required(req.username), required(req.password)) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            return Err(ApiError::BadRequest {
                code: "missing_credentials",
                message: "Username and password are required.".to_string(),
            });
        }
    };

    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized {
            code: "user_not_found",
            message: "Invalid credentials.".to_string(),
        })?;

    let valid = password::verify_password(&password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized {
            code: "invalid_password",
            message: "Invalid credentials.".to_string(),
        });
    }

    let claims = Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::debug!(user_id = user.id, "Issued token");

    Ok(Json(LoginResponse {
        token,
        username: user.username,
    }))
}
