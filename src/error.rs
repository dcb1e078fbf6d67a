use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Fatal errors: the request never produced a usable gateway answer.
///
/// Business declines, HTTP rejections and network failures are not errors;
/// they come back as [`Outcome::Failure`](crate::payments::outcome::Outcome).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Authentication error: no credential configured for '{name}'")]
    Authentication { name: String },

    #[error("Callback URL not configured: '{name}'")]
    CallbackMissing { name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Could not decode gateway response: {message}")]
    Decode { message: String },
}

impl ClientError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn authentication(name: impl Into<String>) -> Self {
        Self::Authentication { name: name.into() }
    }

    pub fn callback_missing(name: impl Into<String>) -> Self {
        Self::CallbackMissing { name: name.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// True for integrator misconfiguration (missing secret, callback or
    /// unusable settings). These never resolve by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::CallbackMissing { .. } | Self::Configuration { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::decode(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::configuration(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::configuration(format!("HTTP client error: {}", err))
    }
}
