//! Click callback endpoints.
//!
//! Click posts `application/x-www-form-urlencoded` bodies and reads the
//! outcome from the JSON `error` field, so every answer is HTTP 200. A body
//! that cannot be parsed is answered with `-8`.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};

use crate::application::handlers::billing::{
    CompleteClickPaymentHandler, PrepareClickPaymentHandler,
};
use crate::domain::billing::{ClickCallback, ClickErrorCode, ClickResponse};

#[derive(Clone)]
pub struct ClickHandlers {
    pub prepare: Arc<PrepareClickPaymentHandler>,
    pub complete: Arc<CompleteClickPaymentHandler>,
}

fn malformed(stage: &'static str, rejection: FormRejection) -> Json<ClickResponse> {
    tracing::warn!(stage, error = %rejection, "malformed click callback");
    Json(ClickResponse::error(ClickErrorCode::BadRequest))
}

/// POST /click/prepare
pub async fn prepare(
    State(handlers): State<ClickHandlers>,
    form: Result<Form<ClickCallback>, FormRejection>,
) -> Json<ClickResponse> {
    match form {
        Ok(Form(callback)) => Json(handlers.prepare.handle(callback).await),
        Err(rejection) => malformed("prepare", rejection),
    }
}

/// POST /click/complete
pub async fn complete(
    State(handlers): State<ClickHandlers>,
    form: Result<Form<ClickCallback>, FormRejection>,
) -> Json<ClickResponse> {
    match form {
        Ok(Form(callback)) => Json(handlers.complete.handle(callback).await),
        Err(rejection) => malformed("complete", rejection),
    }
}
