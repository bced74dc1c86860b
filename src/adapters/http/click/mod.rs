//! HTTP adapter for the Click prepare/complete handshake.

mod handlers;
mod routes;

pub use handlers::ClickHandlers;
pub use routes::click_routes;
