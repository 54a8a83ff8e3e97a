//! Collaborators owned by the host integration setup.
//!
//! The coordinator, its authenticated client and the per-device handles all
//! come from the vendor library and the host's polling loop. Adapters only
//! see them through these traits, which also lets tests swap in mocks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::BoxError;
use crate::platform::StateUpdateSender;

/// One physical unit reachable through the legacy (session-token) API.
///
/// The client library handles its own authentication and session; every
/// operation is a single request.
#[async_trait]
pub trait Device: Send + Sync {
    fn serial_number(&self) -> &str;

    fn name(&self) -> &str;

    /// Vendor product category, e.g. "zappi", "eddi", "libbi"
    fn kind(&self) -> &str;

    fn firmware_version(&self) -> &str;

    async fn start_boost(&self, amount: f64) -> Result<(), BoxError>;

    /// Boost a specific heater/zone for `time` minutes
    async fn manual_boost(&self, target: &str, time: f64) -> Result<(), BoxError>;

    /// `when` is a four character "HHMM" string
    async fn start_smart_boost(&self, amount: f64, when: &str) -> Result<(), BoxError>;

    async fn stop_boost(&self) -> Result<(), BoxError>;

    async fn unlock(&self) -> Result<(), BoxError>;

    /// Charge target in Wh
    async fn set_charge_target(&self, chargetarget: f64) -> Result<(), BoxError>;
}

/// Connection state held inside the vendor client.
pub trait Connection: Send + Sync {
    /// App-level account email, required by the s18 API only
    fn app_email(&self) -> Option<&str>;

    fn app_password(&self) -> Option<&str>;

    /// Check the OAuth token and refresh it if it has expired.
    ///
    /// Performs synchronous I/O; callers must run it off the async runtime.
    fn check_and_update_token(&self) -> Result<(), BoxError>;

    fn access_token(&self) -> String;

    fn timeout(&self) -> Duration;

    /// Shared async HTTP client
    fn http(&self) -> &reqwest::Client;
}

/// Authenticated vendor client owned by the coordinator.
pub trait Client: Send + Sync {
    /// Hub serial number
    fn serial_number(&self) -> &str;

    fn site_name(&self) -> &str;

    fn connection(&self) -> Arc<dyn Connection>;
}

/// Polling/caching component shared by every adapter of a config entry.
pub trait Coordinator: Send + Sync {
    fn client(&self) -> &dyn Client;

    /// Sender for re-render requests to the host
    fn state_updates(&self) -> &StateUpdateSender;
}
