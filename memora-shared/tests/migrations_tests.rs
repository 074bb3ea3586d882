/// Integration tests for the embedded migration runner
///
/// Each test gets a private in-memory SQLite database. The pool is capped at
/// a single connection with no idle or lifetime reaping, otherwise every
/// pooled connection would see its own empty in-memory database.
///
/// Run with: cargo test --test migrations_tests

use memora_shared::db::migrations::{get_migration_status, run_migrations};
use memora_shared::db::pool::{create_pool, DatabaseConfig};
use sqlx::SqlitePool;

/// Helper for a fresh single-connection in-memory pool, not yet migrated
async fn memory_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_seconds: 5,
        idle_timeout_seconds: None,
        max_lifetime_seconds: None,
        test_before_acquire: false,
    };

    create_pool(config).await.expect("Failed to create pool")
}

async fn table_exists(pool: &SqlitePool, name: &str) -> bool {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?)",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("Failed to query sqlite_master")
}

#[tokio::test]
async fn test_run_migrations_creates_schema() {
    let pool = memory_pool().await;

    run_migrations(&pool).await.expect("Migrations should succeed");

    assert!(table_exists(&pool, "users").await, "users table should exist");
    assert!(table_exists(&pool, "events").await, "events table should exist");
}

#[tokio::test]
async fn test_run_migrations_is_idempotent() {
    let pool = memory_pool().await;

    run_migrations(&pool).await.expect("First run should succeed");
    run_migrations(&pool).await.expect("Second run should be a no-op");

    let status = get_migration_status(&pool).await.expect("Failed to get status");
    assert_eq!(status.applied_migrations, 2);
}

#[tokio::test]
async fn test_migration_status_before_migrations() {
    let pool = memory_pool().await;

    let status = get_migration_status(&pool).await.expect("Failed to get status");

    assert_eq!(status.applied_migrations, 0);
    assert_eq!(status.latest_version, None);
    assert!(!status.is_up_to_date);
}

#[tokio::test]
async fn test_migration_status_after_migrations() {
    let pool = memory_pool().await;

    run_migrations(&pool).await.expect("Migrations should succeed");

    let status = get_migration_status(&pool).await.expect("Failed to get status");

    assert_eq!(status.applied_migrations, 2);
    assert_eq!(status.latest_version, Some(20250412093500));
    assert!(status.is_up_to_date);
}

#[tokio::test]
async fn test_events_owner_index_exists() {
    let pool = memory_pool().await;

    run_migrations(&pool).await.expect("Migrations should succeed");

    let index_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT 1 FROM sqlite_master
            WHERE type = 'index' AND name = 'idx_events_owner_id'
        )",
    )
    .fetch_one(&pool)
    .await
    .expect("Failed to query sqlite_master");

    assert!(index_exists, "owner_id index should exist on events");
}

#[tokio::test]
async fn test_events_column_defaults() {
    let pool = memory_pool().await;

    run_migrations(&pool).await.expect("Migrations should succeed");

    sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)")
        .bind("defaults")
        .bind("hash")
        .bind("2025-04-12T09:30:00+00:00")
        .execute(&pool)
        .await
        .expect("Failed to insert user");

    // Insert an event without description or reminder to exercise the
    // column defaults declared in the migration.
    sqlx::query(
        "INSERT INTO events (owner_id, title, occurs_at, created_at, updated_at)
         VALUES (1, 'Dentist', '2025-05-01T10:00:00+00:00',
                 '2025-04-12T09:30:00+00:00', '2025-04-12T09:30:00+00:00')",
    )
    .execute(&pool)
    .await
    .expect("Failed to insert event");

    let (description, reminder): (String, bool) =
        sqlx::query_as("SELECT description, reminder FROM events WHERE owner_id = 1")
            .fetch_one(&pool)
            .await
            .expect("Failed to read event back");

    assert_eq!(description, "");
    assert!(reminder);
}
