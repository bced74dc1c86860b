//! HTTP adapters - REST API implementations.
//!
//! Each module has its own adapter (`dto`, `handlers`, `routes`); `router`
//! assembles them over the application ports.

pub mod billing;
pub mod bot;
pub mod catalog;
pub mod click;
pub mod error;
pub mod favorites;
pub mod health;
pub mod middleware;
pub mod router;
pub mod users;
pub mod workouts;

pub use error::ErrorResponse;
pub use router::{build_router, with_http_layers, AppPorts, AppSettings};
