//! SNMP driver for APC/Schneider rack PDUs
//!
//! Outlets are switched by writing `immediateOn(1)` to
//! `rPDUOutletControlOutletCommand` from the PowerNet MIB. The SET is issued
//! through the net-snmp `snmpset` binary using SNMPv3 authNoPriv, with the
//! command's username as the security name and its password as the
//! authentication passphrase.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command as Process;
use tokio::time::timeout;
use tracing::debug;

use crate::command::Command;
use crate::controller::{check_port, PduController};
use crate::error::{DeviceError, Result};
use crate::types::{DriverConfig, OutletState};

/// rPDUOutletControlOutletCommand, indexed by outlet number
const OUTLET_CONTROL_OID: &str = "1.3.6.1.4.1.318.1.1.12.3.3.1.1.4";

/// rPDUOutletControlOutletCommand value for immediateOn
const IMMEDIATE_ON: &str = "1";

/// Extra time granted to snmpset on top of its own timeout
const PROCESS_GRACE_SECS: u64 = 2;

/// SNMP controller using external snmpset
#[derive(Debug)]
pub struct SnmpController {
    tool: String,
    timeout_secs: u64,
    max_outlets: u32,
}

impl SnmpController {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            tool: config.snmp_tool.clone(),
            timeout_secs: config.timeout().as_secs(),
            max_outlets: config.max_outlets,
        }
    }

    /// OID controlling a single outlet
    fn outlet_oid(outlet: u32) -> String {
        format!("{}.{}", OUTLET_CONTROL_OID, outlet)
    }

    /// Build snmpset args for switching an outlet on
    fn build_args(&self, command: &Command, agent: &str, outlet: u32) -> Vec<String> {
        vec![
            "-v3".to_string(),
            "-l".to_string(),
            "authNoPriv".to_string(),
            "-u".to_string(),
            command.username().to_string(),
            "-a".to_string(),
            "SHA".to_string(),
            "-A".to_string(),
            command.password().to_string(),
            "-t".to_string(),
            self.timeout_secs.to_string(),
            "-r".to_string(),
            "0".to_string(),
            agent.to_string(),
            Self::outlet_oid(outlet),
            "i".to_string(),
            IMMEDIATE_ON.to_string(),
        ]
    }

    async fn execute_snmpset(&self, args: &[String]) -> Result<String> {
        let child = Process::new(&self.tool)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DeviceError::CommandFailed(format!("failed to run '{}': {}", self.tool, e))
            })?;

        let limit = std::time::Duration::from_secs(self.timeout_secs + PROCESS_GRACE_SECS);
        let output = timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| DeviceError::Timeout(format!("snmpset after {}s", limit.as_secs())))?
            .map_err(|e| DeviceError::CommandFailed(format!("snmpset: {}", e)))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(classify_failure(&String::from_utf8_lossy(&output.stderr)))
        }
    }
}

/// Accept only plain net-snmp agent addresses (`host`, `host:port`,
/// `udp:host:port`, `[v6]`); anything that snmpset could read as an option
/// is refused.
fn check_agent_address(address: &str) -> Result<&str> {
    let valid = !address.starts_with('-')
        && address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '_' | '[' | ']' | '%'));

    if valid {
        Ok(address)
    } else {
        Err(DeviceError::InvalidAddress(address.to_string()))
    }
}

/// Map snmpset diagnostics onto device errors
fn classify_failure(stderr: &str) -> DeviceError {
    let detail = stderr.trim().to_string();
    let lower = detail.to_lowercase();

    if lower.contains("timeout") {
        DeviceError::Timeout(detail)
    } else if lower.contains("authentication failure")
        || lower.contains("unknown user name")
        || lower.contains("passphrase")
    {
        DeviceError::AuthenticationFailed(detail)
    } else if lower.contains("unknown host") || lower.contains("no route to host") {
        DeviceError::ConnectionFailed(detail)
    } else if detail.is_empty() {
        DeviceError::CommandFailed("snmpset exited unsuccessfully".to_string())
    } else {
        DeviceError::CommandFailed(detail)
    }
}

#[async_trait]
impl PduController for SnmpController {
    fn manufacturer(&self) -> &str {
        "apc"
    }

    fn aliases(&self) -> &[&str] {
        &["schneider", "schneider electric"]
    }

    async fn power_on(&self, command: &Command) -> Result<Value> {
        let outlet = check_port(command.port(), self.max_outlets)?;
        let agent = check_agent_address(command.address())?;
        let args = self.build_args(command, agent, outlet);

        debug!(address = %agent, outlet, oid = %Self::outlet_oid(outlet), "Issuing SNMP outlet SET");
        let output = self.execute_snmpset(&args).await?;
        debug!(output = %output, "snmpset completed");

        Ok(json!({
            "manufacturer": self.manufacturer(),
            "address": command.address(),
            "outlet": outlet,
            "state": OutletState::On,
        }))
    }
}
