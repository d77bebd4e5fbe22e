//! PDU driver trait

use async_trait::async_trait;
use serde_json::Value;

use crate::command::Command;
use crate::error::{DeviceError, Result};

/// Trait for vendor-specific PDU drivers
///
/// Implementations handle the protocol details (SNMP, Redfish, ...). Every
/// failure must be reported as a [`DeviceError`].
#[async_trait]
pub trait PduController: Send + Sync {
    /// Canonical manufacturer name this driver answers to
    fn manufacturer(&self) -> &str;

    /// Additional manufacturer names routed to this driver
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Energize the outlet named by the command
    async fn power_on(&self, command: &Command) -> Result<Value>;
}

/// Check an outlet number against a driver's outlet count
pub fn check_port(port: i64, max_outlets: u32) -> Result<u32> {
    u32::try_from(port)
        .ok()
        .filter(|p| (1..=max_outlets).contains(p))
        .ok_or(DeviceError::InvalidPort {
            port,
            max: max_outlets,
        })
}
