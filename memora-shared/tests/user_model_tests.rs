/// Integration tests for the User model
///
/// These tests run against a freshly migrated in-memory SQLite database.
/// The pool is capped at a single connection with no idle or lifetime
/// reaping so the in-memory database survives between queries.
///
/// Run with: cargo test --test user_model_tests

use memora_shared::db::migrations::run_migrations;
use memora_shared::db::pool::{create_pool, DatabaseConfig};
use memora_shared::models::user::{NewUser, User};
use sqlx::SqlitePool;

/// Helper for a migrated single-connection in-memory pool
async fn test_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_seconds: 5,
        idle_timeout_seconds: None,
        max_lifetime_seconds: None,
        test_before_acquire: false,
    };

    let pool = create_pool(config).await.expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

#[tokio::test]
async fn test_create_user() {
    let pool = test_pool().await;

    let user = User::create(
        &pool,
        NewUser {
            username: "alice".to_string(),
            password_hash: "$argon2id$fake$hash".to_string(),
        },
    )
    .await
    .expect("Failed to create user");

    assert!(user.id > 0, "Database should assign a positive id");
    assert_eq!(user.username, "alice");
    assert_eq!(user.password_hash, "$argon2id$fake$hash");
}

#[tokio::test]
async fn test_create_user_assigns_distinct_ids() {
    let pool = test_pool().await;

    let alice = User::create(
        &pool,
        NewUser {
            username: "alice".to_string(),
            password_hash: "hash-a".to_string(),
        },
    )
    .await
    .expect("Failed to create alice");

    let bob = User::create(
        &pool,
        NewUser {
            username: "bob".to_string(),
            password_hash: "hash-b".to_string(),
        },
    )
    .await
    .expect("Failed to create bob");

    assert_ne!(alice.id, bob.id);
}

#[tokio::test]
async fn test_find_by_username() {
    let pool = test_pool().await;

    let created = User::create(
        &pool,
        NewUser {
            username: "alice".to_string(),
            password_hash: "hash-a".to_string(),
        },
    )
    .await
    .expect("Failed to create user");

    let found = User::find_by_username(&pool, "alice")
        .await
        .expect("Query failed")
        .expect("User should be found");

    assert_eq!(found.id, created.id);
    assert_eq!(found.username, "alice");
    assert_eq!(found.password_hash, "hash-a");
    assert_eq!(found.created_at, created.created_at);
}

#[tokio::test]
async fn test_find_by_username_missing() {
    let pool = test_pool().await;

    let found = User::find_by_username(&pool, "nobody")
        .await
        .expect("Query failed");

    assert!(found.is_none());
}

#[tokio::test]
async fn test_find_by_username_is_case_sensitive() {
    let pool = test_pool().await;

    User::create(
        &pool,
        NewUser {
            username: "alice".to_string(),
            password_hash: "hash-a".to_string(),
        },
    )
    .await
    .expect("Failed to create user");

    let found = User::find_by_username(&pool, "Alice")
        .await
        .expect("Query failed");

    assert!(found.is_none(), "Usernames are matched exactly");
}

#[tokio::test]
async fn test_duplicate_username_is_unique_violation() {
    let pool = test_pool().await;

    User::create(
        &pool,
        NewUser {
            username: "alice".to_string(),
            password_hash: "hash-a".to_string(),
        },
    )
    .await
    .expect("First insert should succeed");

    let result = User::create(
        &pool,
        NewUser {
            username: "alice".to_string(),
            password_hash: "hash-b".to_string(),
        },
    )
    .await;

    // The API maps this database error onto its conflict response, so the
    // classification matters, not just the failure.
    match result {
        Err(sqlx::Error::Database(db_err)) => {
            assert!(db_err.is_unique_violation(), "Expected a unique violation, got: {db_err}");
        }
        other => panic!("Expected a database error, got: {other:?}"),
    }
}
