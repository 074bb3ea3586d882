/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `events`: Event CRUD endpoints

pub mod auth;
pub mod events;
pub mod health;
