//! Session storage for the PhotoShare backend
//!
//! This crate provides the DynamoDB-backed photo session table: one record
//! per shared photo collection, keyed by an opaque session id.

pub mod photo_session;
