//! Simulated PDU
//!
//! Models a single PDU whose outlets live in memory, whatever address the
//! command names. Useful for demo deployments and for exercising the API
//! without hardware.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::command::Command;
use crate::controller::{check_port, PduController};
use crate::error::{DeviceError, Result};
use crate::types::{DriverConfig, OutletState};

/// In-memory PDU driver
#[derive(Debug)]
pub struct SimulatedController {
    max_outlets: u32,
    outlets: Mutex<BTreeMap<u32, OutletState>>,
}

impl SimulatedController {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            max_outlets: config.max_outlets,
            outlets: Mutex::new(BTreeMap::new()),
        }
    }

    /// Current state of an outlet; never-touched outlets are off
    pub fn outlet_state(&self, outlet: u32) -> OutletState {
        self.outlets
            .lock()
            .ok()
            .and_then(|outlets| outlets.get(&outlet).copied())
            .unwrap_or(OutletState::Off)
    }
}

#[async_trait]
impl PduController for SimulatedController {
    fn manufacturer(&self) -> &str {
        "simulated"
    }

    fn aliases(&self) -> &[&str] {
        &["demo"]
    }

    async fn power_on(&self, command: &Command) -> Result<Value> {
        let outlet = check_port(command.port(), self.max_outlets)?;

        let mut outlets = self
            .outlets
            .lock()
            .map_err(|_| DeviceError::CommandFailed("simulated outlet table poisoned".to_string()))?;
        outlets.insert(outlet, OutletState::On);

        Ok(json!({ "outlet": outlet, "state": OutletState::On }))
    }
}
