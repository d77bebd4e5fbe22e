//! Error types for PDU operations

use thiserror::Error;

/// Classified failure reported by a PDU driver
///
/// Every variant maps to a stable integer code (see [`DeviceError::code`])
/// that is surfaced to API callers as `ErrorCode`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// No driver registered for the requested manufacturer
    #[error("unknown manufacturer: {0}")]
    UnknownManufacturer(String),

    /// Device could not be reached
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Device refused the credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Device rejected or failed the command
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// Operation timed out
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Outlet number outside the device range
    #[error("invalid outlet {port}: expected 1..={max}")]
    InvalidPort { port: i64, max: u32 },

    /// Unsupported operation
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid driver configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Device address the driver refuses to contact
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Vendor-specific failure carrying its own code
    #[error("{message}")]
    Device { code: i32, message: String },
}

impl DeviceError {
    /// Stable error code reported as `ErrorCode`
    pub fn code(&self) -> i32 {
        match self {
            DeviceError::UnknownManufacturer(_) => 1001,
            DeviceError::ConnectionFailed(_) => 1002,
            DeviceError::AuthenticationFailed(_) => 1003,
            DeviceError::CommandFailed(_) => 1004,
            DeviceError::Timeout(_) => 1005,
            DeviceError::InvalidPort { .. } => 1006,
            DeviceError::Unsupported(_) => 1007,
            DeviceError::InvalidConfig(_) => 1008,
            DeviceError::InvalidAddress(_) => 1009,
            DeviceError::Device { code, .. } => *code,
        }
    }

    /// Human-readable message reported as `Message`
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Failure returned by a [`PowerBackend`](crate::PowerBackend)
///
/// `Device` is a classified domain failure; `Internal` is anything the
/// backend could not classify.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DeviceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeviceError::ConnectionFailed("host unreachable".to_string());
        assert_eq!(err.to_string(), "connection failed: host unreachable");

        let err = DeviceError::AuthenticationFailed("bad credentials".to_string());
        assert_eq!(err.to_string(), "authentication failed: bad credentials");

        let err = DeviceError::InvalidPort { port: 0, max: 24 };
        assert_eq!(err.to_string(), "invalid outlet 0: expected 1..=24");
    }

    #[test]
    fn test_vendor_error_keeps_code_and_message() {
        let err = DeviceError::Device {
            code: 42,
            message: "unreachable".to_string(),
        };
        assert_eq!(err.code(), 42);
        assert_eq!(err.message(), "unreachable");
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            DeviceError::UnknownManufacturer(String::new()),
            DeviceError::ConnectionFailed(String::new()),
            DeviceError::AuthenticationFailed(String::new()),
            DeviceError::CommandFailed(String::new()),
            DeviceError::Timeout(String::new()),
            DeviceError::InvalidPort { port: 0, max: 1 },
            DeviceError::Unsupported(String::new()),
            DeviceError::InvalidConfig(String::new()),
            DeviceError::InvalidAddress(String::new()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(DeviceError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|c| *c != 0 && *c != 500));
    }

    #[test]
    fn test_backend_error_from_device() {
        let err: BackendError = DeviceError::Timeout("power on".to_string()).into();
        assert!(matches!(err, BackendError::Device(DeviceError::Timeout(_))));
        assert_eq!(err.to_string(), "operation timed out: power on");
    }
}
