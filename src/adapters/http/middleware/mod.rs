//! HTTP middleware for axum.
//!
//! - `auth` - Bearer session tokens and the `RequireAuth` / `OptionalAuth` extractors

pub mod auth;

pub use auth::{auth_middleware, AuthRejection, AuthState, OptionalAuth, RequireAuth};
