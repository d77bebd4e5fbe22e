//! API routes

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::handler::PowerOnHandler;
use crate::request::ValidationError;

#[derive(Clone)]
pub struct AppState {
    pub handler: PowerOnHandler,
}

/// Routes mounted under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/power_on", post(power_on))
        .route("/power-on", post(power_on))
}

async fn power_on(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let (envelope, status) = match body {
        Ok(bytes) => state.handler.handle(&bytes).await,
        Err(rejection) => state.handler.reject(ValidationError::BodyRejected {
            status: rejection.status().as_u16(),
            reason: rejection.body_text(),
        }),
    };

    (status, Json(envelope)).into_response()
}
