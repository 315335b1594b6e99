//! Picker error types

use thiserror::Error;

/// Errors reported by the injected API client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request to {resource} failed with status {code}: {message}")]
    Status {
        resource: String,
        code: u16,
        message: String,
    },
}

/// Main picker error type
#[derive(Error, Debug)]
pub enum PickerError {
    // ===== Recoverable (surface to the user, keep the dialog open) =====
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),

    // ===== Programming / setup errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dialog already disposed")]
    Disposed,
}

impl PickerError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PickerError::Api(_) | PickerError::Decode(_))
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PickerError::Api(ApiError::NotFound(resource)) => {
                format!("Image service not found: {}", resource)
            }
            PickerError::Api(ApiError::Unauthorized(_)) => {
                "You are not allowed to search images.".to_string()
            }
            PickerError::Api(_) => "The image service could not be reached.".to_string(),
            PickerError::Decode(_) => "The image service returned unexpected data.".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<toml::de::Error> for PickerError {
    fn from(e: toml::de::Error) -> Self {
        PickerError::Config(e.to_string())
    }
}

impl From<std::io::Error> for PickerError {
    fn from(e: std::io::Error) -> Self {
        PickerError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PickerError>;
