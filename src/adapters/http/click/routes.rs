//! HTTP routes for Click callbacks.

use axum::{routing::post, Router};

use super::handlers::{complete, prepare, ClickHandlers};

/// `/click/prepare` and `/click/complete`. Authenticated by the MD5 sign.
pub fn click_routes(handlers: ClickHandlers) -> Router {
    Router::new()
        .route("/click/prepare", post(prepare))
        .route("/click/complete", post(complete))
        .with_state(handlers)
}
