//! Failure classification
//!
//! Maps every way a power-on request can fail onto `(ErrorCode, Message,
//! status)`:
//!
//! | failure | ErrorCode | Message | status |
//! |---|---|---|---|
//! | validation | 500 | validator description | validator status, else 500 |
//! | device | device code | device message | 500 |
//! | unexpected | 500 | failure description | 500 |
//!
//! Validation and unexpected failures share the 500 code with the internal
//! error constant, so callers tell them apart by status only. A device error
//! that reports code 0 is also surfaced as 500, since 0 means success.

use axum::http::StatusCode;
use pdu_control::{BackendError, DeviceError};

use crate::envelope::ResponseEnvelope;
use crate::request::ValidationError;

/// ErrorCode reported for validation and unexpected failures
pub const INTERNAL_ERROR_CODE: i64 = 500;

/// Everything that can go wrong while serving a power-on request
#[derive(Debug)]
pub enum Failure {
    /// Request rejected before the backend was called
    Validation(ValidationError),
    /// Backend reported a classified device failure
    Device(DeviceError),
    /// Anything else, described by its own message
    Unexpected(String),
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Failure::Validation(err)
    }
}

impl From<BackendError> for Failure {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Device(e) => Failure::Device(e),
            BackendError::Internal(e) => Failure::Unexpected(format!("{:#}", e)),
        }
    }
}

/// Result of classifying a [`Failure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub error_code: i64,
    pub message: String,
    pub status: StatusCode,
}

impl Classification {
    pub fn into_response_parts(self) -> (ResponseEnvelope, StatusCode) {
        (
            ResponseEnvelope::failure(self.error_code, self.message),
            self.status,
        )
    }
}

/// Classify a failure; total and side-effect free
pub fn classify(failure: &Failure) -> Classification {
    match failure {
        Failure::Validation(err) => Classification {
            error_code: INTERNAL_ERROR_CODE,
            message: err.to_string(),
            status: err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        },
        Failure::Device(err) => Classification {
            error_code: match err.code() {
                0 => INTERNAL_ERROR_CODE,
                code => i64::from(code),
            },
            message: err.message(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        },
        Failure::Unexpected(description) => Classification {
            error_code: INTERNAL_ERROR_CODE,
            message: description.clone(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Field;

    #[test]
    fn test_classify_validation() {
        let failure = Failure::Validation(ValidationError::MissingField(Field::Password));

        let c = classify(&failure);
        assert_eq!(c.error_code, 500);
        assert!(c.message.contains("password"));
        assert_eq!(c.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_classify_validation_without_status() {
        let failure = Failure::Validation(ValidationError::BodyRejected {
            status: 500,
            reason: "stream error".to_string(),
        });

        let c = classify(&failure);
        assert_eq!(c.error_code, 500);
        assert_eq!(c.message, "request body rejected: stream error");
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_classify_validation_payload_too_large() {
        let failure = Failure::Validation(ValidationError::BodyRejected {
            status: 413,
            reason: "length limit exceeded".to_string(),
        });

        assert_eq!(classify(&failure).status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_classify_device() {
        let failure = Failure::Device(DeviceError::Device {
            code: 42,
            message: "unreachable".to_string(),
        });

        assert_eq!(
            classify(&failure),
            Classification {
                error_code: 42,
                message: "unreachable".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }
        );
    }

    #[test]
    fn test_classify_device_zero_code_is_not_success() {
        let failure = Failure::Device(DeviceError::Device {
            code: 0,
            message: "unreachable".to_string(),
        });

        let c = classify(&failure);
        assert_eq!(c.error_code, INTERNAL_ERROR_CODE);
        assert_eq!(c.message, "unreachable");
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!c.into_response_parts().0.is_success());
    }

    #[test]
    fn test_classify_device_timeout() {
        let failure = Failure::Device(DeviceError::Timeout("snmpset after 12s".to_string()));

        let c = classify(&failure);
        assert_eq!(c.error_code, 1005);
        assert_eq!(c.message, "operation timed out: snmpset after 12s");
        assert_eq!(c.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_classify_unexpected() {
        let failure = Failure::Unexpected("worker pool gone".to_string());

        assert_eq!(
            classify(&failure),
            Classification {
                error_code: 500,
                message: "worker pool gone".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            }
        );
    }

    #[test]
    fn test_backend_internal_becomes_unexpected() {
        let err = BackendError::Internal(anyhow::anyhow!("driver table corrupt").context("lookup"));

        match Failure::from(err) {
            Failure::Unexpected(message) => {
                assert_eq!(message, "lookup: driver table corrupt");
            }
            other => panic!("expected unexpected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        let failures = [
            Failure::Validation(ValidationError::MissingField(Field::Port)),
            Failure::Device(DeviceError::ConnectionFailed("no route".to_string())),
            Failure::Unexpected("boom".to_string()),
        ];

        for failure in &failures {
            assert_eq!(classify(failure), classify(failure));
        }
    }

    #[test]
    fn test_into_response_parts() {
        let (envelope, status) = classify(&Failure::Unexpected("boom".to_string()))
            .into_response_parts();

        assert_eq!(envelope, ResponseEnvelope::failure(500, "boom"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
