//! Service-call dispatch.
//!
//! The host invokes entity actions by service name with a JSON data object.
//! Data is validated and coerced here (numeric strings such as `"44"` are
//! accepted wherever a number is expected) before any vendor call is made.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Deserializer;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;
use strum::IntoStaticStr;
use tracing::debug;

use crate::entity::MyenergiEntity;
use crate::error::Error;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum Service {
    #[strum(serialize = "myenergi_boost")]
    Boost,
    #[strum(serialize = "myenergi_eddi_boost")]
    EddiBoost,
    #[strum(serialize = "myenergi_smart_boost")]
    SmartBoost,
    #[strum(serialize = "myenergi_stop_boost")]
    StopBoost,
    #[strum(serialize = "myenergi_unlock")]
    Unlock,
    #[strum(serialize = "myenergi_libbi_charge_target")]
    LibbiChargeTarget,
    #[strum(serialize = "myenergi_set_managed_mode")]
    SetManagedMode,
    #[strum(serialize = "myenergi_set_super_schedule_slot")]
    SetSuperScheduleSlot,
}

/// A validated service call, ready to run against an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    Boost {
        amount: f64,
    },
    EddiBoost {
        target: String,
        time: f64,
    },
    SmartBoost {
        amount: f64,
        when: String,
    },
    StopBoost,
    Unlock,
    LibbiChargeTarget {
        chargetarget: f64,
    },
    SetManagedMode {
        managed_mode_enabled: bool,
        auto_scheduler_enabled: Option<bool>,
    },
    SetSuperScheduleSlot {
        start_time: String,
        end_time: String,
        mode: String,
        charge_rate_watts: Option<f64>,
        energy_target_wh: Option<f64>,
    },
}

#[derive(Deserialize)]
struct BoostData {
    #[serde(deserialize_with = "coerce_f64")]
    amount: f64,
}

#[derive(Deserialize)]
struct EddiBoostData {
    target: String,
    #[serde(deserialize_with = "coerce_f64")]
    time: f64,
}

#[derive(Deserialize)]
struct SmartBoostData {
    #[serde(deserialize_with = "coerce_f64")]
    amount: f64,
    when: String,
}

#[derive(Deserialize)]
struct ChargeTargetData {
    #[serde(deserialize_with = "coerce_f64")]
    chargetarget: f64,
}

#[derive(Deserialize)]
struct ManagedModeData {
    managed_mode_enabled: bool,
    #[serde(default)]
    auto_scheduler_enabled: Option<bool>,
}

#[derive(Deserialize)]
struct SuperScheduleSlotData {
    start_time: String,
    end_time: String,
    mode: String,
    #[serde(default, deserialize_with = "coerce_opt_f64")]
    charge_rate_watts: Option<f64>,
    #[serde(default, deserialize_with = "coerce_opt_f64")]
    energy_target_wh: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Float(f64),
    Str(String),
}

impl Number {
    fn into_f64<E: serde::de::Error>(self) -> std::result::Result<f64, E> {
        let v: f64 = match self {
            Number::Float(v) => v,
            Number::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got {:?}", s)))?,
        };
        if !v.is_finite() {
            return Err(E::custom(format!("expected a finite number, got {}", v)));
        }
        Ok(v)
    }
}

fn coerce_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    Number::deserialize(d)?.into_f64()
}

fn coerce_opt_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    Option::<Number>::deserialize(d)?
        .map(Number::into_f64)
        .transpose()
}

fn data<T: DeserializeOwned>(service: Service, data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|source| Error::InvalidServiceData {
        service: service.into(),
        source,
    })
}

impl ServiceCall {
    /// Validate `data` against the schema of the named service.
    ///
    /// Keys the service does not use (e.g. `entity_id`) are ignored.
    pub fn parse(service: &str, payload: serde_json::Value) -> Result<Self> {
        let service = Service::from_str(service)
            .map_err(|_| Error::UnknownService(service.to_string()))?;

        let call = match service {
            Service::Boost => {
                let d: BoostData = data(service, payload)?;
                ServiceCall::Boost { amount: d.amount }
            }
            Service::EddiBoost => {
                let d: EddiBoostData = data(service, payload)?;
                ServiceCall::EddiBoost {
                    target: d.target,
                    time: d.time,
                }
            }
            Service::SmartBoost => {
                let d: SmartBoostData = data(service, payload)?;
                ServiceCall::SmartBoost {
                    amount: d.amount,
                    when: d.when,
                }
            }
            Service::StopBoost => ServiceCall::StopBoost,
            Service::Unlock => ServiceCall::Unlock,
            Service::LibbiChargeTarget => {
                let d: ChargeTargetData = data(service, payload)?;
                ServiceCall::LibbiChargeTarget {
                    chargetarget: d.chargetarget,
                }
            }
            Service::SetManagedMode => {
                let d: ManagedModeData = data(service, payload)?;
                ServiceCall::SetManagedMode {
                    managed_mode_enabled: d.managed_mode_enabled,
                    auto_scheduler_enabled: d.auto_scheduler_enabled,
                }
            }
            Service::SetSuperScheduleSlot => {
                let d: SuperScheduleSlotData = data(service, payload)?;
                ServiceCall::SetSuperScheduleSlot {
                    start_time: d.start_time,
                    end_time: d.end_time,
                    mode: d.mode,
                    charge_rate_watts: d.charge_rate_watts,
                    energy_target_wh: d.energy_target_wh,
                }
            }
        };

        Ok(call)
    }

    pub fn service(&self) -> Service {
        match self {
            ServiceCall::Boost { .. } => Service::Boost,
            ServiceCall::EddiBoost { .. } => Service::EddiBoost,
            ServiceCall::SmartBoost { .. } => Service::SmartBoost,
            ServiceCall::StopBoost => Service::StopBoost,
            ServiceCall::Unlock => Service::Unlock,
            ServiceCall::LibbiChargeTarget { .. } => Service::LibbiChargeTarget,
            ServiceCall::SetManagedMode { .. } => Service::SetManagedMode,
            ServiceCall::SetSuperScheduleSlot { .. } => Service::SetSuperScheduleSlot,
        }
    }

    /// Run the call; the action's error is returned unchanged.
    pub async fn invoke(&self, entity: &MyenergiEntity) -> Result<()> {
        debug!("Dispatching {}", self.service());
        match self {
            ServiceCall::Boost { amount } => entity.start_boost(*amount).await,
            ServiceCall::EddiBoost { target, time } => entity.start_eddi_boost(target, *time).await,
            ServiceCall::SmartBoost { amount, when } => {
                entity.start_smart_boost(*amount, when).await
            }
            ServiceCall::StopBoost => entity.stop_boost().await,
            ServiceCall::Unlock => entity.unlock().await,
            ServiceCall::LibbiChargeTarget { chargetarget } => {
                entity.set_charge_target(*chargetarget).await
            }
            ServiceCall::SetManagedMode {
                managed_mode_enabled,
                auto_scheduler_enabled,
            } => {
                entity
                    .set_managed_mode(*managed_mode_enabled, *auto_scheduler_enabled)
                    .await
            }
            ServiceCall::SetSuperScheduleSlot {
                start_time,
                end_time,
                mode,
                charge_rate_watts,
                energy_target_wh,
            } => {
                entity
                    .set_super_schedule_slot(
                        start_time,
                        end_time,
                        mode,
                        *charge_rate_watts,
                        *energy_target_wh,
                    )
                    .await
            }
        }
    }
}

/// Parse and run a service call against `entity`.
pub async fn call_service(
    entity: &MyenergiEntity,
    service: &str,
    payload: serde_json::Value,
) -> Result<()> {
    ServiceCall::parse(service, payload)?.invoke(entity).await
}
