//! Manufacturer dispatch
//!
//! The [`ControllerRegistry`] maps manufacturer names onto drivers and is the
//! default [`PowerBackend`] used by the server.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::command::Command;
use crate::controller::PduController;
use crate::error::{BackendError, DeviceError};
use crate::redfish::RedfishController;
use crate::simulated::SimulatedController;
use crate::snmp::SnmpController;
use crate::types::DriverConfig;

/// Device control backend consumed by the request handler
///
/// Implementations must be safe to share across concurrent requests.
/// Device-level problems are reported as [`BackendError::Device`]; anything
/// else as [`BackendError::Internal`].
#[async_trait]
pub trait PowerBackend: Send + Sync {
    async fn power_on(&self, command: &Command) -> Result<Value, BackendError>;
}

/// Registry of PDU drivers keyed by manufacturer name
///
/// Names are matched case-insensitively.
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: HashMap<String, Arc<dyn PduController>>,
}

impl ControllerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the bundled drivers
    pub fn from_config(config: &DriverConfig) -> crate::error::Result<Self> {
        let mut registry = Self::new();
        registry.register(SnmpController::new(config));
        registry.register(RedfishController::new(config)?);
        if config.enable_simulated {
            registry.register(SimulatedController::new(config));
        }

        info!(manufacturers = ?registry.manufacturers(), "PDU drivers registered");
        Ok(registry)
    }

    /// Register a driver under its manufacturer name and aliases
    pub fn register<C: PduController + 'static>(&mut self, controller: C) {
        self.register_arc(Arc::new(controller));
    }

    /// Register a driver (Arc version for shared ownership)
    pub fn register_arc(&mut self, controller: Arc<dyn PduController>) {
        let names = std::iter::once(controller.manufacturer())
            .chain(controller.aliases().iter().copied())
            .map(normalize)
            .collect::<Vec<_>>();
        for name in names {
            self.controllers.insert(name, controller.clone());
        }
    }

    /// Get the driver for a manufacturer
    pub fn get(&self, manufacturer: &str) -> Option<&Arc<dyn PduController>> {
        self.controllers.get(&normalize(manufacturer))
    }

    /// All registered names, sorted
    pub fn manufacturers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[async_trait]
impl PowerBackend for ControllerRegistry {
    async fn power_on(&self, command: &Command) -> Result<Value, BackendError> {
        let controller = self
            .get(command.manufacturer())
            .ok_or_else(|| DeviceError::UnknownManufacturer(command.manufacturer().to_string()))?;

        debug!(
            driver = controller.manufacturer(),
            address = %command.address(),
            port = command.port(),
            "Dispatching power-on"
        );
        Ok(controller.power_on(command).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(manufacturer: &str) -> Command {
        Command::new(manufacturer, "10.0.0.5", "admin", "secret", 3).unwrap()
    }

    #[test]
    fn test_register_with_aliases() {
        let mut registry = ControllerRegistry::new();
        registry.register(SimulatedController::new(&DriverConfig::default()));

        assert!(registry.get("simulated").is_some());
        assert!(registry.get("Demo").is_some());
        assert!(registry.get(" SIMULATED ").is_some());
        assert!(registry.get("apc").is_none());
        assert_eq!(registry.manufacturers(), vec!["demo", "simulated"]);
    }

    #[test]
    fn test_from_config() {
        let registry = ControllerRegistry::from_config(&DriverConfig::default()).unwrap();
        assert!(registry.get("apc").is_some());
        assert!(registry.get("schneider").is_some());
        assert!(registry.get("redfish").is_some());
        assert!(registry.get("simulated").is_none());

        let registry =
            ControllerRegistry::from_config(&DriverConfig::default().with_simulated(true)).unwrap();
        assert!(registry.get("simulated").is_some());
    }

    #[tokio::test]
    async fn test_dispatch_to_driver() {
        let mut registry = ControllerRegistry::new();
        registry.register(SimulatedController::new(&DriverConfig::default()));

        let result = registry.power_on(&command("Simulated")).await.unwrap();
        assert_eq!(result, json!({ "outlet": 3, "state": "on" }));
    }

    #[tokio::test]
    async fn test_unknown_manufacturer() {
        let registry = ControllerRegistry::new();

        let err = registry.power_on(&command("Acme")).await.unwrap_err();
        match err {
            BackendError::Device(e) => {
                assert_eq!(e, DeviceError::UnknownManufacturer("Acme".to_string()));
                assert_eq!(e.code(), 1001);
            }
            other => panic!("expected device error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_driver_error_is_device_error() {
        let mut registry = ControllerRegistry::new();
        registry.register(SimulatedController::new(
            &DriverConfig::default().with_max_outlets(2),
        ));

        let err = registry.power_on(&command("simulated")).await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Device(DeviceError::InvalidPort { port: 3, max: 2 })
        ));
    }
}
