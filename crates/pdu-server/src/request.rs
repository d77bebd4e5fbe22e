//! Power-on request schema
//!
//! The body must be a JSON object with five required fields:
//!
//! | field | type |
//! |---|---|
//! | `manufacturer` | string |
//! | `ip` | string |
//! | `username` | string |
//! | `password` | string |
//! | `port` | integer, or a string holding one |
//!
//! Presence and type are checked in that order and the first problem is
//! reported. Emptiness is checked when the [`Command`] is built. Unknown
//! fields are ignored.

use axum::http::StatusCode;
use pdu_control::{Command, CommandError};
use serde_json::{Map, Value};
use thiserror::Error;

/// Fields of the power-on request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Manufacturer,
    Ip,
    Username,
    Password,
    Port,
}

impl Field {
    /// JSON key
    pub fn name(self) -> &'static str {
        match self {
            Field::Manufacturer => "manufacturer",
            Field::Ip => "ip",
            Field::Username => "username",
            Field::Password => "password",
            Field::Port => "port",
        }
    }

    /// Short description shown alongside validation failures
    pub fn help(self) -> &'static str {
        match self {
            Field::Manufacturer => "Manufacturer",
            Field::Ip => "IP",
            Field::Username => "UserName",
            Field::Password => "Password",
            Field::Port => "Port Number",
        }
    }
}

/// Request rejected before reaching the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body is not a JSON object
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Required field absent or null
    #[error("missing required field '{}': {}", .0.name(), .0.help())]
    MissingField(Field),

    /// Field present with the wrong JSON type
    #[error("invalid value for field '{}': expected {} ({})", .field.name(), .expected, .field.help())]
    InvalidType { field: Field, expected: &'static str },

    /// Text field empty
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Body could not be read by the transport (e.g. over the size limit)
    #[error("request body rejected: {reason}")]
    BodyRejected { status: u16, reason: String },
}

impl ValidationError {
    /// Status code this failure asks for, if it names one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ValidationError::BodyRejected { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error()),
            _ => Some(StatusCode::BAD_REQUEST),
        }
    }
}

impl From<CommandError> for ValidationError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::EmptyField(field) => ValidationError::EmptyField(field),
        }
    }
}

/// Validate a raw request body into a [`Command`]
pub fn parse_power_on(body: &[u8]) -> Result<Command, ValidationError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;
    let fields = value
        .as_object()
        .ok_or_else(|| ValidationError::MalformedBody("expected a JSON object".to_string()))?;

    let manufacturer = string_field(fields, Field::Manufacturer)?;
    let ip = string_field(fields, Field::Ip)?;
    let username = string_field(fields, Field::Username)?;
    let password = string_field(fields, Field::Password)?;
    let port = integer_field(fields, Field::Port)?;

    Ok(Command::new(manufacturer, ip, username, password, port)?)
}

fn present(fields: &Map<String, Value>, field: Field) -> Result<&Value, ValidationError> {
    match fields.get(field.name()) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn string_field(fields: &Map<String, Value>, field: Field) -> Result<String, ValidationError> {
    match present(fields, field)? {
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn integer_field(fields: &Map<String, Value>, field: Field) -> Result<i64, ValidationError> {
    let invalid = || ValidationError::InvalidType {
        field,
        expected: "an integer",
    };

    match present(fields, field)? {
        Value::Number(n) => n.as_i64().ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
