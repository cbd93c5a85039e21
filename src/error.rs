use std::fmt;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScryfallError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("scryfall error status {status}: {source}")]
    ApiErrorBody {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("scryfall error status {status}: failed to read body: {source}")]
    ErrorBodyRead {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("download failed with status {status}")]
    DownloadFailed { status: u16 },

    #[error("Malformed payload: {message}")]
    MalformedPayload {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Callback error: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ScryfallError {
    /// Wrap an arbitrary error returned from a record callback.
    pub fn callback<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Callback(err.into())
    }

    pub(crate) fn malformed_with(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedPayload {
            message: message.into(),
            source: Some(source),
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::ApiErrorBody { status, .. }
            | Self::ErrorBodyRead { status, .. }
            | Self::DownloadFailed { status } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ApiError: Error object returned by the Scryfall API on non-2xx responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// HTTP status code of the response. Not part of the body; attached after decoding.
    #[serde(skip)]
    pub status: u16,
    pub details: Option<String>,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub warnings: Vec<String>,
}

impl ApiError {
    /// Decode an error body. An empty body yields an error carrying only the status.
    pub(crate) fn from_body(status: u16, body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self {
                status,
                ..Self::default()
            });
        }
        let mut err: Self = serde_json::from_slice(body)
            .map_err(|source| ScryfallError::ApiErrorBody { status, source })?;
        err.status = status;
        Ok(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.details.as_deref() {
            Some(details) if !details.is_empty() => {
                write!(f, "scryfall api error ({}): {}", self.status, details)
            }
            _ => write!(f, "scryfall api error ({})", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

pub type Result<T> = std::result::Result<T, ScryfallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_decodes_body_and_attaches_status() {
        let body = br#"{"object":"error","code":"not_found","status":404,"details":"No card found","type":"ambiguous","warnings":["a","b"]}"#;
        let err = ApiError::from_body(404, body).unwrap();
        assert_eq!(err.status, 404);
        assert_eq!(err.details.as_deref(), Some("No card found"));
        assert_eq!(err.error_type.as_deref(), Some("ambiguous"));
        assert_eq!(err.warnings, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "scryfall api error (404): No card found");
    }

    #[test]
    fn api_error_empty_body_keeps_status() {
        let err = ApiError::from_body(503, b"").unwrap();
        assert_eq!(err.status, 503);
        assert!(err.details.is_none());
        assert_eq!(err.to_string(), "scryfall api error (503)");
    }

    #[test]
    fn api_error_malformed_body_wraps_status() {
        let err = ApiError::from_body(500, b"<html>oops</html>").unwrap_err();
        match err {
            ScryfallError::ApiErrorBody { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_is_exposed_for_http_failures() {
        assert_eq!(
            ScryfallError::DownloadFailed { status: 404 }.status(),
            Some(404)
        );
        assert_eq!(ScryfallError::Cancelled.status(), None);
    }

    #[test]
    fn callback_helper_boxes_foreign_errors() {
        let err = ScryfallError::callback("stop here");
        assert_eq!(err.to_string(), "Callback error: stop here");
    }
}
