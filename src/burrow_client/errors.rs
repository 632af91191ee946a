use log::Level;
use thiserror::Error;

/// Possible errors from a [`super::LagServiceClient`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP client could not be built.
    #[error("Failed to initialize HTTP client: {0}")]
    Init(#[source] reqwest::Error),

    /// The base URL can't have path segments appended to it.
    #[error("Burrow address '{0}' can't be used as base URL")]
    InvalidBaseUrl(String),

    /// Connection failed, timed out, or was interrupted while reading the response.
    #[error("Burrow unreachable at '{url}': {source}")]
    Unreachable {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Burrow answered with a non-2xx status (other than 404).
    #[error("Burrow responded with status {status} to '{url}'")]
    BadStatus {
        url: String,
        status: u16,
    },

    /// Burrow answered, but flagged the response as an error.
    #[error("Burrow reported an error for '{url}': {message}")]
    Upstream {
        url: String,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Failed to decode Burrow response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The requested entity doesn't exist (anymore).
    #[error("Not found at '{url}'")]
    NotFound {
        url: String,
    },
}

impl ClientError {
    /// Stable classification of the error, usable as a metric label value.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Init(_)
            | ClientError::InvalidBaseUrl(_)
            | ClientError::Unreachable { .. } => "unreachable",
            ClientError::BadStatus { .. }
            | ClientError::Upstream { .. }
            | ClientError::Decode { .. } => "bad_response",
            ClientError::NotFound { .. } => "not_found",
        }
    }

    /// Level at which this error should be logged.
    ///
    /// Entities vanishing between a list and a detail request are expected, so `NotFound`
    /// is less severe than everything else.
    pub fn log_level(&self) -> Level {
        match self {
            ClientError::NotFound { .. } => Level::Debug,
            _ => Level::Warn,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
