//! Power-on request handler

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::http::StatusCode;
use futures::FutureExt;
use pdu_control::PowerBackend;
use serde_json::Value;
use tracing::{info, warn};

use crate::classify::{classify, Failure};
use crate::envelope::ResponseEnvelope;
use crate::request::{parse_power_on, ValidationError};

/// Validates power-on requests, dispatches them to the backend exactly once
/// and turns the outcome into a [`ResponseEnvelope`]
///
/// Holds no per-request state; one instance serves all concurrent requests.
#[derive(Clone)]
pub struct PowerOnHandler {
    backend: Arc<dyn PowerBackend>,
}

impl PowerOnHandler {
    pub fn new(backend: Arc<dyn PowerBackend>) -> Self {
        Self { backend }
    }

    /// Handle a raw request body; never fails
    pub async fn handle(&self, body: &[u8]) -> (ResponseEnvelope, StatusCode) {
        match self.execute(body).await {
            Ok(data) => (ResponseEnvelope::success(data), StatusCode::OK),
            Err(failure) => respond(&failure),
        }
    }

    /// Answer for a body the transport could not deliver
    pub fn reject(&self, err: ValidationError) -> (ResponseEnvelope, StatusCode) {
        respond(&Failure::Validation(err))
    }

    async fn execute(&self, body: &[u8]) -> Result<Value, Failure> {
        let command = parse_power_on(body)?;

        info!(
            manufacturer = %command.manufacturer(),
            address = %command.address(),
            port = command.port(),
            "Power-on requested"
        );

        match AssertUnwindSafe(self.backend.power_on(&command))
            .catch_unwind()
            .await
        {
            Ok(Ok(data)) => {
                info!(
                    manufacturer = %command.manufacturer(),
                    address = %command.address(),
                    port = command.port(),
                    "Outlet powered on"
                );
                Ok(data)
            }
            Ok(Err(err)) => Err(err.into()),
            Err(panic) => Err(Failure::Unexpected(panic_message(panic.as_ref()))),
        }
    }
}

fn respond(failure: &Failure) -> (ResponseEnvelope, StatusCode) {
    let classification = classify(failure);
    warn!(
        error_code = classification.error_code,
        status = classification.status.as_u16(),
        message = %classification.message,
        "Power-on failed"
    );
    classification.into_response_parts()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("backend panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("backend panicked: {}", s)
    } else {
        "backend panicked".to_string()
    }
}
