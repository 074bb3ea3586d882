/// Authentication and authorization utilities
///
/// This module provides the authentication primitives for Memora:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Axum guard that gates protected routes on a valid token
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing with a fixed 24-hour lifetime
/// - **Constant-time Comparison**: Password verification uses constant-time operations
/// - **Uniform Rejection**: The guard answers every authentication failure identically
///
/// # Example
///
/// ```no_run
/// use memora_shared::auth::jwt::{create_token, Claims};
/// use memora_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Token issuance
/// let claims = Claims::new(42);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
