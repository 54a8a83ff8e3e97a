//! myenergi integration: exposes zappi/eddi/libbi devices and the site hub as
//! host entities and forwards service calls to the vendor APIs.

pub mod config;
pub mod entity;
mod error;
pub mod platform;
pub mod s18;
pub mod services;
pub mod vendor;

pub use config::ConfigEntry;
pub use config::ConfigError;
pub use config::Options;
pub use entity::MyenergiEntity;
pub use entity::MyenergiHub;
pub use error::BoxError;
pub use error::Error;
pub use error::Result;
pub use services::call_service;
pub use services::Service;
pub use services::ServiceCall;
