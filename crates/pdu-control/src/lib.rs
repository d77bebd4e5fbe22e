//! PDU Outlet Control
//!
//! This crate turns a validated [`Command`] into a vendor-specific power-on
//! operation against a Power Distribution Unit.
//!
//! # Supported Drivers
//!
//! - **SNMP**: APC/Schneider rack PDUs via the PowerNet MIB (`snmpset`)
//! - **Redfish**: DMTF Redfish `RackPDUs` outlet power control over HTTPS
//! - **Simulated**: in-memory outlets for demos and tests
//!
//! # Example
//!
//! ```
//! use pdu_control::{Command, ControllerRegistry, DriverConfig, PowerBackend, SimulatedController};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut registry = ControllerRegistry::new();
//! registry.register(SimulatedController::new(&DriverConfig::default()));
//!
//! let command = Command::new("simulated", "10.0.0.5", "admin", "secret", 3)?;
//! let result = registry.power_on(&command).await?;
//! assert_eq!(result["state"], "on");
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod controller;
pub mod error;
pub mod redfish;
pub mod registry;
pub mod simulated;
pub mod snmp;
pub mod types;

pub use command::{Command, CommandError};
pub use controller::PduController;
pub use error::{BackendError, DeviceError, Result};
pub use redfish::RedfishController;
pub use registry::{ControllerRegistry, PowerBackend};
pub use simulated::SimulatedController;
pub use snmp::SnmpController;
pub use types::{DriverConfig, OutletState};
