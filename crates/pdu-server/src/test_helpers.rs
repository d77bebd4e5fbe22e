//! Test helpers for pdu-server
//!
//! Provides a scripted backend and router constructors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pdu_control::{BackendError, Command, DeviceError, PowerBackend};
use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::handler::PowerOnHandler;

/// What the scripted backend does when called
enum Script {
    Succeed(Value),
    Fail(DeviceError),
    Internal(String),
    Panic(String),
}

/// Backend with a fixed outcome that records how it was called
pub struct ScriptedBackend {
    script: Script,
    calls: AtomicUsize,
    last_command: Mutex<Option<Command>>,
}

impl ScriptedBackend {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_command: Mutex::new(None),
        }
    }

    pub fn succeed(data: Value) -> Self {
        Self::new(Script::Succeed(data))
    }

    pub fn fail(err: DeviceError) -> Self {
        Self::new(Script::Fail(err))
    }

    pub fn internal(message: &str) -> Self {
        Self::new(Script::Internal(message.to_string()))
    }

    pub fn panic(message: &str) -> Self {
        Self::new(Script::Panic(message.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_command(&self) -> Option<Command> {
        self.last_command.lock().unwrap().clone()
    }
}

#[async_trait]
impl PowerBackend for ScriptedBackend {
    async fn power_on(&self, command: &Command) -> Result<Value, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_command.lock().unwrap() = Some(command.clone());

        match &self.script {
            Script::Succeed(data) => Ok(data.clone()),
            Script::Fail(err) => Err(err.clone().into()),
            Script::Internal(message) => Err(BackendError::Internal(anyhow::anyhow!(message.clone()))),
            Script::Panic(message) => panic!("{}", message),
        }
    }
}

/// The request from the Acme scenario
pub fn valid_request() -> Value {
    json!({
        "manufacturer": "Acme",
        "ip": "10.0.0.5",
        "username": "admin",
        "password": "secret",
        "port": 3
    })
}

pub fn body(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

/// Create the full application router around a backend
pub fn create_test_app(backend: Arc<dyn PowerBackend>) -> axum::Router {
    crate::server::app(PowerOnHandler::new(backend), &ServerConfig::default())
}

/// Create the application router with a custom body limit
pub fn create_test_app_with_limit(backend: Arc<dyn PowerBackend>, max_body_bytes: usize) -> axum::Router {
    let config = ServerConfig {
        max_body_bytes,
        ..ServerConfig::default()
    };
    crate::server::app(PowerOnHandler::new(backend), &config)
}
