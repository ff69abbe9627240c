pub mod auth;

pub use auth::AuthenticatedSession;
