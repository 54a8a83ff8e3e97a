mod device;
mod entity;
mod message;
mod meta;

pub use device::DeviceInfo;
pub use entity::merge_attributes;
pub use entity::Entity;
pub use entity::DOMAIN;
pub use entity::MANUFACTURER;
pub use message::schedule_update;
pub use message::StateRefresh;
pub use message::StateUpdateReceiver;
pub use message::StateUpdateSender;
pub use meta::AttrValue;
pub use meta::Attributes;
pub use meta::EntityCategory;
pub use meta::Meta;
