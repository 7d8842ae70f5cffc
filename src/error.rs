use std::io;
use std::result::Result as StdResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("API invalid format: {0}")]
    ApiInvalidFormat(String),
    #[error("API authentication failed: {0}")]
    ApiAuthFailed(String),
    #[error("API maintenance: {0}")]
    ApiMaintenance(String),
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },
    #[error("Request cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl Error {
    /// Text shown to the user when this error ends up in a notification.
    pub fn user_message(&self) -> String {
        match self {
            Error::ApiError(msg)
            | Error::ApiInvalidFormat(msg)
            | Error::ApiAuthFailed(msg)
            | Error::ApiMaintenance(msg)
            | Error::RateLimitExceeded(msg)
            | Error::NotFound(msg)
            | Error::ValidationError(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ApiInvalidFormat(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

pub type Result<T> = StdResult<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_strips_category_prefix() {
        let err = Error::ApiError("Loan already funded".to_string());
        assert_eq!(err.to_string(), "API error: Loan already funded");
        assert_eq!(err.user_message(), "Loan already funded");
    }

    #[test]
    fn unknown_variant_keeps_raw_value() {
        let err = Error::UnknownVariant { kind: "loan status", value: "frozen".into() };
        assert_eq!(err.user_message(), "Unknown loan status value: frozen");
    }
}
