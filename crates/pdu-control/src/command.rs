//! The validated power-on command

use std::fmt;

use thiserror::Error;

/// Rejection raised while assembling a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A required text field was empty or whitespace only
    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// "Power on outlet `port` of the PDU at `address` using these credentials"
///
/// A `Command` only exists once every field has been checked, so drivers can
/// rely on non-empty identifiers. The outlet number is not range checked here;
/// each driver knows its own outlet count.
#[derive(Clone, PartialEq, Eq)]
pub struct Command {
    manufacturer: String,
    address: String,
    username: String,
    password: String,
    port: i64,
}

impl Command {
    /// Build a command, rejecting empty text fields
    pub fn new(
        manufacturer: impl Into<String>,
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        port: i64,
    ) -> Result<Self, CommandError> {
        let manufacturer = non_empty("manufacturer", manufacturer.into())?;
        let address = non_empty("ip", address.into())?;
        let username = non_empty("username", username.into())?;
        let password = non_empty("password", password.into())?;

        Ok(Self {
            manufacturer,
            address,
            username,
            password,
            port,
        })
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Network address of the PDU
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Outlet number to energize
    pub fn port(&self) -> i64 {
        self.port
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("manufacturer", &self.manufacturer)
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &"********")
            .field("port", &self.port)
            .finish()
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, CommandError> {
    if value.trim().is_empty() {
        Err(CommandError::EmptyField(field))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_accessors() {
        let cmd = Command::new("Acme", "10.0.0.5", "admin", "secret", 3).unwrap();

        assert_eq!(cmd.manufacturer(), "Acme");
        assert_eq!(cmd.address(), "10.0.0.5");
        assert_eq!(cmd.username(), "admin");
        assert_eq!(cmd.password(), "secret");
        assert_eq!(cmd.port(), 3);
    }

    #[test]
    fn test_command_rejects_empty_fields() {
        assert_eq!(
            Command::new("", "10.0.0.5", "admin", "secret", 1),
            Err(CommandError::EmptyField("manufacturer"))
        );
        assert_eq!(
            Command::new("Acme", "  ", "admin", "secret", 1),
            Err(CommandError::EmptyField("ip"))
        );
        assert_eq!(
            Command::new("Acme", "10.0.0.5", "admin", "", 1),
            Err(CommandError::EmptyField("password"))
        );
    }

    #[test]
    fn test_command_port_not_range_checked() {
        let cmd = Command::new("Acme", "10.0.0.5", "admin", "secret", -7).unwrap();
        assert_eq!(cmd.port(), -7);
    }

    #[test]
    fn test_debug_hides_password() {
        let cmd = Command::new("Acme", "10.0.0.5", "admin", "hunter2", 3).unwrap();
        let rendered = format!("{:?}", cmd);

        assert!(rendered.contains("10.0.0.5"));
        assert!(!rendered.contains("hunter2"));
    }
}
