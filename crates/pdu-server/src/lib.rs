//! PDU Gateway server
//!
//! HTTP front for the power-on command. Every request, whatever happens
//! while serving it, answers with a [`ResponseEnvelope`]:
//!
//! ```json
//! { "ErrorCode": 0, "Message": null, "Data": { "outlet": 3, "state": "on" } }
//! ```
//!
//! `ErrorCode == 0` is the only success signal. Failures carry a non-zero
//! code and a message, see [`classify`] for the mapping.

pub mod api;
pub mod classify;
pub mod config;
pub mod envelope;
pub mod handler;
pub mod request;
pub mod server;

#[cfg(test)]
mod test_helpers;

pub use classify::{classify, Classification, Failure, INTERNAL_ERROR_CODE};
pub use config::{Config, ConfigError, ServerConfig};
pub use envelope::ResponseEnvelope;
pub use handler::PowerOnHandler;
pub use request::{parse_power_on, Field, ValidationError};
pub use server::{app, run, serve};
