use std::sync::Arc;

use crate::config::ConfigEntry;
use crate::platform;
use crate::platform::Attributes;
use crate::platform::DeviceInfo;
use crate::platform::Entity;
use crate::platform::EntityCategory;
use crate::platform::Meta;
use crate::vendor::Coordinator;

/// Entity adapter for the site-level hub. Metadata only, no actions.
pub struct MyenergiHub {
    coordinator: Arc<dyn Coordinator>,
    config_entry: Arc<ConfigEntry>,
    meta: Meta,
}

impl MyenergiHub {
    pub fn new(coordinator: Arc<dyn Coordinator>, config_entry: Arc<ConfigEntry>, meta: Meta) -> Self {
        Self {
            coordinator,
            config_entry,
            meta,
        }
    }

    pub fn config_entry(&self) -> &ConfigEntry {
        &self.config_entry
    }
}

impl Entity for MyenergiHub {
    fn device_info(&self) -> DeviceInfo {
        let client = self.coordinator.client();
        DeviceInfo::new(
            platform::DOMAIN,
            client.serial_number(),
            client.site_name().to_string(),
            platform::MANUFACTURER,
        )
        .with_model("Hub")
    }

    fn entity_category(&self) -> Option<EntityCategory> {
        self.meta.category
    }

    fn extra_state_attributes(&self) -> Attributes {
        platform::merge_attributes(&self.meta.attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::AttrValue;
    use crate::vendor::mock::coordinator;
    use crate::vendor::mock::MockConnection;

    fn hub(meta: Meta) -> (MyenergiHub, crate::platform::StateUpdateReceiver) {
        let (coordinator, _, rx) = coordinator(MockConnection::default());
        let entry = Arc::new(ConfigEntry::new("01JHW3K8", "Home"));
        (MyenergiHub::new(coordinator, entry, meta), rx)
    }

    #[test]
    fn test_device_info() {
        let (hub, _rx) = hub(Meta::default());
        let info = hub.device_info();

        assert_eq!(
            info.identifiers,
            vec![("myenergi".to_string(), "21509692".to_string())]
        );
        assert_eq!(info.name, "Home");
        assert_eq!(info.model.as_deref(), Some("Hub"));
        assert_eq!(info.manufacturer, "myenergi");
        assert_eq!(info.sw_version, None);
        assert_eq!(hub.config_entry().title, "Home");
    }

    #[test]
    fn test_meta() {
        let meta = Meta::new(Some("config"), Attributes::new())
            .unwrap()
            .with_attr("phases", 3_i64);
        let (hub, _rx) = hub(meta);

        assert_eq!(hub.entity_category(), Some(EntityCategory::Config));
        let attrs = hub.extra_state_attributes();
        assert_eq!(attrs["integration"], AttrValue::from("myenergi"));
        assert_eq!(attrs["phases"], AttrValue::Int(3));
    }

    #[test]
    fn test_empty_meta() {
        let (hub, _rx) = hub(Meta::default());
        assert_eq!(hub.entity_category(), None);
        assert_eq!(hub.extra_state_attributes().len(), 1);
    }
}
