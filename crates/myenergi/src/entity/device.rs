use std::sync::Arc;

use reqwest::Method;
use tracing::debug;

use crate::config::ConfigEntry;
use crate::error::Error;
use crate::error::Result;
use crate::platform;
use crate::platform::Attributes;
use crate::platform::DeviceInfo;
use crate::platform::Entity;
use crate::platform::EntityCategory;
use crate::platform::Meta;
use crate::s18;
use crate::s18::CloudConfiguration;
use crate::s18::S18Client;
use crate::s18::ScheduleSlot;
use crate::s18::SuperSchedule;
use crate::vendor::Coordinator;
use crate::vendor::Device;

/// Entity adapter for one physical device (zappi, eddi, libbi, ...).
///
/// Actions are forwarded to the legacy client through the device handle,
/// except managed mode and the super schedule which go to the s18 API.
/// Successful actions ask the host to re-render this entity, with the
/// exception of `unlock`.
pub struct MyenergiEntity {
    coordinator: Arc<dyn Coordinator>,
    device: Arc<dyn Device>,
    config_entry: Arc<ConfigEntry>,
    meta: Meta,
}

impl MyenergiEntity {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        device: Arc<dyn Device>,
        config_entry: Arc<ConfigEntry>,
        meta: Option<Meta>,
    ) -> Self {
        Self {
            coordinator,
            device,
            config_entry,
            meta: meta.unwrap_or_default(),
        }
    }

    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }

    pub fn config_entry(&self) -> &ConfigEntry {
        &self.config_entry
    }

    fn schedule_update_state(&self) {
        platform::schedule_update(
            self.coordinator.state_updates(),
            self.device.serial_number(),
        );
    }

    pub async fn start_boost(&self, amount: f64) -> Result<()> {
        debug!("Start boost called, amount {}", amount);
        self.device.start_boost(amount).await.map_err(Error::Legacy)?;
        self.schedule_update_state();
        Ok(())
    }

    pub async fn start_eddi_boost(&self, target: &str, time: f64) -> Result<()> {
        debug!("Start eddi boost called, time {} target {}", time, target);
        self.device
            .manual_boost(target, time)
            .await
            .map_err(Error::Legacy)?;
        self.schedule_update_state();
        Ok(())
    }

    pub async fn start_smart_boost(&self, amount: f64, when: &str) -> Result<()> {
        debug!("Start smart boost called, amount {} when {}", amount, when);
        let when = smart_boost_time(when);
        self.device
            .start_smart_boost(amount, &when)
            .await
            .map_err(Error::Legacy)?;
        self.schedule_update_state();
        Ok(())
    }

    pub async fn stop_boost(&self) -> Result<()> {
        debug!("Stop boost called");
        self.device.stop_boost().await.map_err(Error::Legacy)?;
        self.schedule_update_state();
        Ok(())
    }

    /// Unlock is momentary and never shows up in polled state, so no
    /// re-render is requested.
    pub async fn unlock(&self) -> Result<()> {
        debug!("Unlock called");
        self.device.unlock().await.map_err(Error::Legacy)
    }

    pub async fn set_charge_target(&self, chargetarget: f64) -> Result<()> {
        debug!("Setting libbi charge target to {} Wh", chargetarget);
        self.device
            .set_charge_target(chargetarget)
            .await
            .map_err(Error::Legacy)?;
        self.schedule_update_state();
        Ok(())
    }

    pub async fn set_managed_mode(
        &self,
        managed_mode_enabled: bool,
        auto_scheduler_enabled: Option<bool>,
    ) -> Result<()> {
        debug!(
            "Set managed mode called, enabled {} auto scheduler {:?}",
            managed_mode_enabled, auto_scheduler_enabled
        );
        let endpoint = format!("/devices/{}/cloud-configuration", self.s18_device_id()?);
        let body = CloudConfiguration {
            managed_mode_enabled,
            auto_scheduler_enabled,
        };
        self.s18().request(Method::PATCH, &endpoint, Some(&body)).await?;
        self.schedule_update_state();
        Ok(())
    }

    /// Replace the super schedule with a single slot.
    pub async fn set_super_schedule_slot(
        &self,
        start_time: &str,
        end_time: &str,
        mode: &str,
        charge_rate_watts: Option<f64>,
        energy_target_wh: Option<f64>,
    ) -> Result<()> {
        debug!(
            "Set super schedule slot called, {} - {} mode {} rate {:?} target {:?}",
            start_time, end_time, mode, charge_rate_watts, energy_target_wh
        );
        let endpoint = format!("/devices/{}/super-schedule", self.s18_device_id()?);
        let body = SuperSchedule::single(ScheduleSlot::new(
            start_time,
            end_time,
            mode,
            charge_rate_watts,
            energy_target_wh,
        )?);
        self.s18().request(Method::PUT, &endpoint, Some(&body)).await?;
        self.schedule_update_state();
        Ok(())
    }

    fn s18_device_id(&self) -> Result<String> {
        s18::device_id(self.device.kind(), self.device.serial_number())
    }

    fn s18(&self) -> S18Client {
        S18Client::new(
            self.coordinator.client().connection(),
            &self.config_entry.options.s18_base_url,
        )
    }
}

impl Entity for MyenergiEntity {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo::new(
            platform::DOMAIN,
            self.device.serial_number(),
            self.device.name().to_string(),
            platform::MANUFACTURER,
        )
        .with_model(capitalize(self.device.kind()))
        .with_sw_version(self.device.firmware_version())
    }

    fn entity_category(&self) -> Option<EntityCategory> {
        self.meta.category
    }

    fn extra_state_attributes(&self) -> Attributes {
        platform::merge_attributes(&self.meta.attrs)
    }
}

/// Normalise a smart boost time ("HH:MM[:SS]") to the "HHMM" the legacy API
/// expects: colons are dropped and the result is cut to four characters.
/// Shorter input is passed through unpadded.
pub fn smart_boost_time(when: &str) -> String {
    when.chars().filter(|c| *c != ':').take(4).collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
