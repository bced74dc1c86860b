//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum routes, DTOs and the auth middleware
//! - `postgres` - sqlx repositories
//! - `memory` - in-process repositories for tests and local runs
//! - `click` - Click merchant API client
//! - `telegram` - bot notifier and command parsing
//! - `auth` - JWT session tokens
//! - `scheduler` - renewal, reminder and expiry jobs

pub mod auth;
pub mod click;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod scheduler;
pub mod telegram;
