/// Common test utilities for the API integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A fresh, migrated in-memory SQLite database per test
/// - Router construction with a fixed test configuration
/// - Request dispatch and JSON body parsing helpers
/// - Direct user seeding plus token minting for the event tests
///
/// The whole suite is hermetic: nothing reads the environment and nothing
/// touches the filesystem or network.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use memora_api::app::{build_router, AppState};
use memora_api::config::{ApiConfig, Config, DatabaseConfig as ApiDatabaseConfig, JwtConfig};
use memora_shared::auth::jwt::{create_token, Claims};
use memora_shared::db::migrations::run_migrations;
use memora_shared::db::pool::{create_pool, DatabaseConfig};
use memora_shared::models::user::{NewUser, User};
use serde_json::json;
use sqlx::SqlitePool;
use tower::Service as _;

/// Signing secret used by every test token (32+ bytes, as config requires)
pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context holding the database and the router under test
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory database
    ///
    /// The pool is capped at a single connection with no idle or lifetime
    /// reaping so the in-memory database survives for the pool's life.
    pub async fn new() -> anyhow::Result<Self> {
        let db = create_pool(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: None,
            max_lifetime_seconds: None,
            test_before_acquire: false,
        })
        .await?;

        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: ApiDatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Inserts a user row directly and mints a valid token for it
    ///
    /// The event tests establish identity this way instead of going through
    /// register/login, which keeps them independent of the auth flow and
    /// skips an Argon2 hash per test. The stored hash is a placeholder; the
    /// seeded user never logs in.
    pub async fn seed_user(&self, username: &str) -> anyhow::Result<(i64, String)> {
        let user = User::create(
            &self.db,
            NewUser {
                username: username.to_string(),
                password_hash: format!("hash-for-{username}"),
            },
        )
        .await?;

        let token = create_token(&Claims::new(user.id), TEST_SECRET)?;

        Ok((user.id, token))
    }

    /// Sends a request through the router and returns status plus JSON body
    ///
    /// `token` is attached as a bearer credential when present. An empty
    /// response body parses to JSON null.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .app
            .clone()
            .call(request)
            .await
            .expect("Router call failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body should be JSON")
        };

        (status, json)
    }

    /// Registers a user over HTTP
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> (StatusCode, serde_json::Value) {
        self.send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Logs a user in over HTTP
    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Creates an event over HTTP as the given token's user
    pub async fn create_event(
        &self,
        token: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send("POST", "/api/events", Some(token), Some(body)).await
    }

    /// Lists the token's user's events over HTTP
    pub async fn list_events(&self, token: &str) -> (StatusCode, serde_json::Value) {
        self.send("GET", "/api/events", Some(token), None).await
    }
}
