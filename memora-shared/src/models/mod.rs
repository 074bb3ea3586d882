/// Database models for Memora
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (registration identity + password hash)
/// - `event`: Per-user calendar events with reminder flags
///
/// # Example
///
/// ```no_run
/// use memora_shared::models::user::{NewUser, User};
/// # use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     NewUser {
///         username: "alice".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod event;
pub mod user;
