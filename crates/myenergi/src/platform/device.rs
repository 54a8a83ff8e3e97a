use serde::Serialize;

/// Identity record the host uses to group entities under one physical device.
///
/// Mirrors the host's device registry entry: every entity reporting the same
/// `identifiers` is attached to the same device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// `(domain, unique id)` pairs.
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sw_version: Option<String>,
}

impl DeviceInfo {
    pub fn new(domain: &str, unique_id: &str, name: String, manufacturer: &str) -> Self {
        Self {
            identifiers: vec![(domain.to_string(), unique_id.to_string())],
            name,
            manufacturer: manufacturer.to_string(),
            model: None,
            sw_version: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_sw_version(mut self, sw_version: impl Into<String>) -> Self {
        self.sw_version = Some(sw_version.into());
        self
    }
}
