//! HTTP requests and responses as plain data.
//!
//! The dispatcher builds an [`ApiRequest`] and classifies a [`RawResponse`]
//! without touching the network; a [`Transport`](crate::transport::Transport)
//! performs the round-trip in between. Both client flavours share this
//! boundary, so only the transport differs between them.

/// HTTP method for an API call. Misskey endpoints are almost all POST.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

/// An outgoing API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Absolute URL, `{base}/api/{endpoint}`.
    pub url: String,
    /// JSON body, already carrying the token if one is set.
    pub body: serde_json::Value,
    /// Endpoint name, kept for logging.
    pub endpoint: String,
}

/// A response as received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
