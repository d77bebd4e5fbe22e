//! Redfish driver
//!
//! Redfish models rack PDUs under `PowerEquipment/RackPDUs`. Each outlet
//! exposes an `Outlet.PowerControl` action that takes a target `PowerState`.
//!
//! Credentials travel as HTTP basic auth, so endpoints must be `https://`
//! unless `redfish_insecure` is set.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::command::Command;
use crate::controller::{check_port, PduController};
use crate::error::{DeviceError, Result};
use crate::types::{DriverConfig, OutletState};

/// Rack PDU collection member addressed by this driver
const RACK_PDU_ID: &str = "1";

/// Redfish REST API controller
#[derive(Debug)]
pub struct RedfishController {
    client: Client,
    max_outlets: u32,
    allow_http: bool,
}

impl RedfishController {
    /// Create a new Redfish controller
    pub fn new(config: &DriverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.redfish_insecure)
            .build()
            .map_err(|e| DeviceError::InvalidConfig(format!("redfish HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_outlets: config.max_outlets,
            allow_http: config.redfish_insecure,
        })
    }

    /// Base URL for a device address; bare hosts default to HTTPS
    ///
    /// The address may carry a scheme but nothing past `host[:port]`.
    fn base_url(&self, address: &str) -> Result<String> {
        let address = address.trim();
        let (scheme, authority) = match address.split_once("://") {
            Some((scheme, rest)) => (scheme.to_ascii_lowercase(), rest),
            None => ("https".to_string(), address),
        };
        let authority = authority.trim_end_matches('/');

        let scheme_allowed = scheme == "https" || (scheme == "http" && self.allow_http);
        if !scheme_allowed {
            return Err(DeviceError::InvalidAddress(format!(
                "scheme '{}' not allowed: {}",
                scheme, address
            )));
        }

        let bad_authority = authority.is_empty()
            || authority
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '\\'));
        if bad_authority {
            return Err(DeviceError::InvalidAddress(address.to_string()));
        }

        Ok(format!("{}://{}", scheme, authority))
    }

    /// Build the outlet power control action URL
    fn power_control_url(&self, address: &str, outlet: u32) -> Result<String> {
        Ok(format!(
            "{}/redfish/v1/PowerEquipment/RackPDUs/{}/Outlets/{}/Actions/Outlet.PowerControl",
            self.base_url(address)?,
            RACK_PDU_ID,
            outlet
        ))
    }
}

fn map_transport_error(err: reqwest::Error) -> DeviceError {
    if err.is_timeout() {
        DeviceError::Timeout(err.to_string())
    } else if err.is_connect() {
        DeviceError::ConnectionFailed(err.to_string())
    } else {
        DeviceError::CommandFailed(err.to_string())
    }
}

#[async_trait]
impl PduController for RedfishController {
    fn manufacturer(&self) -> &str {
        "redfish"
    }

    async fn power_on(&self, command: &Command) -> Result<Value> {
        let outlet = check_port(command.port(), self.max_outlets)?;
        let url = self.power_control_url(command.address(), outlet)?;

        debug!(url = %url, "POST Redfish outlet power control");
        let response = self
            .client
            .post(&url)
            .basic_auth(command.username(), Some(command.password()))
            .json(&json!({ "PowerState": "On" }))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        match status {
            s if s.is_success() => Ok(json!({
                "manufacturer": self.manufacturer(),
                "address": command.address(),
                "outlet": outlet,
                "state": OutletState::On,
            })),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                DeviceError::AuthenticationFailed(format!("{} returned {}", url, status)),
            ),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(DeviceError::CommandFailed(format!(
                    "{} returned {}: {}",
                    url,
                    status,
                    body.trim()
                )))
            }
        }
    }
}
