//! Entity adapters exposed to the host.
//!
//! Both adapters are thin views over the shared coordinator: they never open
//! their own sessions, except for the s18 requests issued by `MyenergiEntity`.

mod device;
mod hub;

pub use device::smart_boost_time;
pub use device::MyenergiEntity;
pub use hub::MyenergiHub;
