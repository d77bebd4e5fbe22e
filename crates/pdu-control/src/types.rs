//! Common types for PDU drivers

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outlet power state as reported in driver results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutletState {
    On,
    Off,
}

impl std::fmt::Display for OutletState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutletState::On => write!(f, "on"),
            OutletState::Off => write!(f, "off"),
        }
    }
}

/// Settings shared by all drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Per-operation timeout in seconds
    pub timeout_secs: u64,
    /// Path or name of the net-snmp `snmpset` binary
    pub snmp_tool: String,
    /// Highest outlet number a driver accepts
    pub max_outlets: u32,
    /// Allow self-signed certificates and plain `http://` Redfish endpoints
    pub redfish_insecure: bool,
    /// Register the in-memory simulated driver
    pub enable_simulated: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            snmp_tool: "snmpset".to_string(),
            max_outlets: 48,
            redfish_insecure: false,
            enable_simulated: false,
        }
    }
}

impl DriverConfig {
    /// Per-operation timeout, never below one second
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Set the per-operation timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the snmpset binary
    pub fn with_snmp_tool(mut self, tool: impl Into<String>) -> Self {
        self.snmp_tool = tool.into();
        self
    }

    /// Set the outlet count
    pub fn with_max_outlets(mut self, max: u32) -> Self {
        self.max_outlets = max;
        self
    }

    /// Allow insecure Redfish transports
    pub fn with_redfish_insecure(mut self, insecure: bool) -> Self {
        self.redfish_insecure = insecure;
        self
    }

    /// Enable the simulated driver
    pub fn with_simulated(mut self, enabled: bool) -> Self {
        self.enable_simulated = enabled;
        self
    }
}
