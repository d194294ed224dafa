//! Error kinds surfaced by the backend client and the config loader

use thiserror::Error;

/// Failure of a single backend call
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login rejected with 401
    #[error("Invalid username or password")]
    AuthenticationFailed,
    /// Protected call made without a valid session
    #[error("Not authenticated - please log in again")]
    Unauthenticated,
    /// Backend answered with a status the call does not expect
    #[error("Request failed: HTTP {0}")]
    RequestFailed(u16),
    #[error("{}", describe_transport(.0))]
    Transport(#[source] reqwest::Error),
    /// Malformed JSON or image body
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Short label for the error kind, used in notifications and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::AuthenticationFailed => "authentication failed",
            ClientError::Unauthenticated => "unauthenticated",
            ClientError::RequestFailed(_) => "request failed",
            ClientError::Transport(_) => "transport error",
            ClientError::Decode(_) => "decode error",
            ClientError::InvalidUrl(_) => "invalid url",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() || e.is_body() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e)
        }
    }
}

impl From<image::ImageError> for ClientError {
    fn from(e: image::ImageError) -> Self {
        ClientError::Decode(e.to_string())
    }
}

fn describe_transport(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timed out".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

/// Failure while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid base URL {0:?}: expected an absolute http(s) URL")]
    BaseUrl(String),
    #[error("Invalid timeout {0:?}: expected a positive number of seconds")]
    Timeout(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
