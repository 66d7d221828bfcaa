//! Client error types.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Sentinel used for `code` and `message` when the server's error envelope
/// is missing or malformed.
pub const UNKNOWN: &str = "UNKNOWN";

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The address is malformed or uses a scheme other than http/https.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The server rejected a token during verification.
    #[error("Authorization failed ({status}): {message}")]
    AuthorizationFailed {
        /// HTTP status code of the rejected verification call.
        status: u16,
        /// Error message reported by the server.
        message: String,
    },

    /// Transport-level failure (DNS, connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// Success status but the body could not be parsed as JSON.
    #[error("Response format error ({status}): {message}")]
    ResponseFormat {
        /// HTTP status code of the response.
        status: u16,
        /// Parser message.
        message: String,
    },

    /// The server rejected the request.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A decoded entity is missing a required field or a value failed coercion.
    #[error("Schema violation in {entity}: {message}")]
    SchemaViolation {
        /// Name of the entity being decoded.
        entity: &'static str,
        /// What went wrong.
        message: String,
    },

    /// Endpoint arguments did not serialize into a JSON object.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::AuthorizationFailed { .. })
            || matches!(self, Error::Api(e) if e.status == 401 || e.status == 403)
    }

    /// Check if this is a transport failure.
    pub fn is_network_error(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Api(e) if e.status == 429)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api(e) if e.status >= 500)
    }

    /// The server's error code, if this is an API error.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Error::Api(e) => Some(&e.code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Identifier attached to a server error.
///
/// Misskey sends a UUID per error kind; anything that fails UUID parsing is
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorId {
    Uuid(Uuid),
    Raw(String),
}

impl ErrorId {
    fn parse(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(id) => ErrorId::Uuid(id),
            Err(_) => ErrorId::Raw(raw.to_string()),
        }
    }

    /// The UUID, if the server sent a well-formed one.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            ErrorId::Uuid(id) => Some(*id),
            ErrorId::Raw(_) => None,
        }
    }
}

impl Default for ErrorId {
    fn default() -> Self {
        ErrorId::Uuid(Uuid::nil())
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorId::Uuid(id) => write!(f, "{id}"),
            ErrorId::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Error reported by the server for a non-success status.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("API error ({status}) {code}: {message} [{id}]")]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error code from server, e.g. `NO_SUCH_NOTE`.
    pub code: String,
    /// Error message from server.
    pub message: String,
    /// Error identifier.
    pub id: ErrorId,
    /// Error kind (`client`, `server`, `permission`), when sent.
    pub kind: Option<String>,
    /// Extra details attached by the server.
    pub info: Option<serde_json::Value>,
}

impl ApiError {
    /// Build an error from a response body, falling back to sentinels for
    /// anything the envelope does not provide.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let envelope = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_default();

        ApiError {
            status,
            code: envelope.code.unwrap_or_else(|| UNKNOWN.to_string()),
            message: envelope.message.unwrap_or_else(|| UNKNOWN.to_string()),
            id: envelope
                .id
                .as_deref()
                .map(ErrorId::parse)
                .unwrap_or_default(),
            kind: envelope.kind,
            info: envelope.info,
        }
    }
}

/// Error response from the server.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default, deserialize_with = "lenient_string")]
    code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    kind: Option<String>,
    #[serde(default)]
    info: Option<serde_json::Value>,
}

/// Accept any JSON value, keeping it only when it is a string.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_envelope() {
        let body = br#"{"error":{"code":"I_AM_AI","message":"You sent a request to Ai-chan.","id":"60c46cd1-f23a-46b1-bebe-5d2b73951a84","kind":"client"}}"#;
        let err = ApiError::from_body(418, body);
        assert_eq!(err.status, 418);
        assert_eq!(err.code, "I_AM_AI");
        assert_eq!(err.kind.as_deref(), Some("client"));
        assert_eq!(
            err.id.as_uuid(),
            Some(Uuid::parse_str("60c46cd1-f23a-46b1-bebe-5d2b73951a84").unwrap())
        );
    }

    #[test]
    fn keeps_invalid_uuid_as_raw() {
        let body = br#"{"error":{"code":"TEST","message":"test","id":"this is invalid uuid test"}}"#;
        let err = ApiError::from_body(400, body);
        assert_eq!(err.code, "TEST");
        assert_eq!(err.id, ErrorId::Raw("this is invalid uuid test".to_string()));
        assert_eq!(err.id.as_uuid(), None);
    }

    #[test]
    fn falls_back_to_sentinels_for_garbage() {
        let err = ApiError::from_body(502, b"<html>Bad Gateway</html>");
        assert_eq!(err.status, 502);
        assert_eq!(err.code, UNKNOWN);
        assert_eq!(err.message, UNKNOWN);
        assert_eq!(err.id, ErrorId::Uuid(Uuid::nil()));
    }

    #[test]
    fn falls_back_per_field() {
        let err = ApiError::from_body(400, br#"{"error":{"code":"X","id":42}}"#);
        assert_eq!(err.code, "X");
        assert_eq!(err.message, UNKNOWN);
        assert_eq!(err.id, ErrorId::default());
    }

    #[test]
    fn predicates() {
        let api = |status| Error::Api(ApiError::from_body(status, b""));
        assert!(api(401).is_auth_error());
        assert!(api(429).is_rate_limited());
        assert!(api(503).is_server_error());
        assert!(!api(400).is_server_error());
        assert!(Error::Network("refused".into()).is_network_error());
        assert_eq!(api(400).api_code(), Some(UNKNOWN));
    }
}
