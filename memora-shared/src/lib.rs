//! # Memora Shared Library
//!
//! This crate contains the types and business logic shared by the Memora
//! API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, JWT issuance/validation, and the route guard
//! - `db`: Connection pool management and embedded migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Memora shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
