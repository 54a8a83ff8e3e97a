/// Boxed error returned by external collaborators (legacy client, token refresh).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Configuration errors: raised before any network call.
    #[error(
        "App credentials are required for this service. \
        Please configure app_email and app_password in integration options."
    )]
    MissingAppCredentials,

    #[error("Unsupported device kind for s18 API: {0}")]
    UnsupportedDeviceKind(String),

    #[error("Unrecognized entity category: {0:?}")]
    InvalidCategory(String),

    #[error("{field} must be a finite number within the integer range, got {value}")]
    InvalidValue { field: &'static str, value: f64 },

    // Request errors
    #[error("s18 API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse s18 API response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to refresh OAuth token: {0}")]
    TokenRefresh(#[source] BoxError),

    #[error("Legacy API call failed: {0}")]
    Legacy(#[source] BoxError),

    // Service dispatch
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Invalid data for service {service}: {source}")]
    InvalidServiceData {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Missing or unusable integration configuration. The operator has to fix
    /// the config entry; retrying the call will not help.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingAppCredentials | Self::UnsupportedDeviceKind(_) | Self::InvalidCategory(_)
        )
    }

    /// A vendor API call was attempted and failed.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Json(_) | Self::TokenRefresh(_) | Self::Legacy(_)
        )
    }
}
