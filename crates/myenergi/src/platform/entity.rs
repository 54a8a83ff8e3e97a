//! Entity abstraction consumed by the host's entity registry.
//!
//! Both the per-device and the site hub adapters implement `Entity`.

use super::device::DeviceInfo;
use super::meta::AttrValue;
use super::meta::Attributes;
use super::meta::EntityCategory;

/// Integration domain; also the value of the fixed `integration` attribute.
pub const DOMAIN: &str = "myenergi";

pub const MANUFACTURER: &str = "myenergi";

pub trait Entity: Send + Sync {
    /// Identity of the physical device this entity belongs to
    fn device_info(&self) -> DeviceInfo;

    fn entity_category(&self) -> Option<EntityCategory>;

    /// Attributes merged into the entity's exposed state.
    fn extra_state_attributes(&self) -> Attributes;

    /// Serialize the registry view of this entity to JSON for the host
    fn registry_json(&self) -> serde_json::Value {
        serde_json::json!({
            "device_info": self.device_info(),
            "entity_category": self.entity_category(),
            "extra_state_attributes": self.extra_state_attributes(),
        })
    }
}

/// `{integration: DOMAIN}` overlaid with the metadata attributes.
///
/// Metadata is applied last, so a metadata key named `integration` replaces
/// the fixed one.
pub fn merge_attributes(meta_attrs: &Attributes) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("integration".to_string(), AttrValue::from(DOMAIN));
    attrs.extend(meta_attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
    attrs
}
