//! PhotoShare backend service

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

/// JWT token management
pub mod jwt;

/// S3 upload broker
pub mod media_storage;

/// Request middleware
pub mod middleware;

/// Password generation and hashing
pub mod password;

/// Route handlers
pub mod routes;

/// Server setup
pub mod server;

/// Shared types (environment, errors)
pub mod types;
