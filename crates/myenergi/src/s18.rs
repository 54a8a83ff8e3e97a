//! Client for the vendor's second cloud API ("s18").
//!
//! Base: https://api.s18.myenergi.net
//! Auth: `Authorization: Bearer <access token>` taken from the legacy
//! client's connection, which also owns the token refresh routine.
//!
//! Only managed mode and the super schedule are reached through this API, and
//! only for zappi chargers.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::error::Result;
use crate::vendor::Connection;

pub const S18_BASE_URL: &str = "https://api.s18.myenergi.net";

const ZAPPI_KIND: &str = "zappi";

/// Device identifier used by the s18 API: `"ZA" + serial`, zappi only.
pub fn device_id(kind: &str, serial_number: &str) -> Result<String> {
    if kind == ZAPPI_KIND {
        Ok(format!("ZA{}", serial_number))
    } else {
        Err(Error::UnsupportedDeviceKind(kind.to_string()))
    }
}

/// Body of `PATCH /devices/{deviceId}/cloud-configuration`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudConfiguration {
    pub managed_mode_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scheduler_enabled: Option<bool>,
}

/// One super-schedule slot. Times are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub start_time: String,
    pub end_time: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_rate_watts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_target_wh: Option<i64>,
}

impl ScheduleSlot {
    /// Fractional watts/watt-hours are truncated toward zero. Values that
    /// are not finite or do not fit in an i64 are rejected.
    pub fn new(
        start_time: &str,
        end_time: &str,
        mode: &str,
        charge_rate_watts: Option<f64>,
        energy_target_wh: Option<f64>,
    ) -> Result<Self> {
        Ok(Self {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            mode: mode.to_string(),
            charge_rate_watts: charge_rate_watts
                .map(|w| to_integer("charge_rate_watts", w))
                .transpose()?,
            energy_target_wh: energy_target_wh
                .map(|wh| to_integer("energy_target_wh", wh))
                .transpose()?,
        })
    }
}

// 2^63: the first f64 above i64::MAX.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn to_integer(field: &'static str, value: f64) -> Result<i64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated >= I64_BOUND || truncated < -I64_BOUND {
        return Err(Error::InvalidValue { field, value });
    }
    Ok(truncated as i64)
}

/// Body of `PUT /devices/{deviceId}/super-schedule`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperSchedule {
    pub charge_schedules: Vec<ScheduleSlot>,
}

impl SuperSchedule {
    pub fn single(slot: ScheduleSlot) -> Self {
        Self {
            charge_schedules: vec![slot],
        }
    }
}

/// Issues single authenticated requests against the s18 API.
///
/// There is no retry: every failure is returned to the caller as-is.
pub struct S18Client {
    connection: Arc<dyn Connection>,
    base_url: String,
}

impl S18Client {
    pub fn new(connection: Arc<dyn Connection>, base_url: &str) -> Self {
        Self {
            connection,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send `method` to `base_url + endpoint` and return the parsed JSON
    /// body, or an empty object when the body is empty.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&B>,
    ) -> Result<Value> {
        let has_email = self.connection.app_email().is_some_and(|e| !e.is_empty());
        let has_password = self.connection.app_password().is_some_and(|p| !p.is_empty());
        if !has_email || !has_password {
            return Err(Error::MissingAppCredentials);
        }

        // The refresh routine does blocking I/O.
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || connection.check_and_update_token())
            .await
            .map_err(|e| Error::TokenRefresh(Box::new(e)))?
            .map_err(Error::TokenRefresh)?;

        let url = format!("{}{}", self.base_url, endpoint);
        debug!("{} {}", method, url);

        let mut req = self
            .connection
            .http()
            .request(method, url)
            .bearer_auth(self.connection.access_token())
            .timeout(self.connection.timeout());
        if let Some(payload) = payload {
            req = req.json(payload);
        }

        let resp = req.send().await?.error_for_status()?;
        let body = resp.bytes().await?;
        if body.is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(serde_json::from_slice(&body)?)
    }
}
