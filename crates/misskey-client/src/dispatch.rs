//! Request building and response classification.
//!
//! `Dispatcher` is the I/O-free half of every API call. It is shared by the
//! async and blocking handles; each of them only adds a transport call
//! between [`Dispatcher::build`] and [`Dispatcher::classify`].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Error, Result};
use crate::http::{ApiRequest, HttpMethod, RawResponse};

/// Body key that carries the access token.
pub const TOKEN_KEY: &str = "i";

/// Argument payload: camelCase wire keys to JSON values.
pub type Arguments = Map<String, Value>;

/// Serialize a typed argument struct into an [`Arguments`] map.
///
/// Optional fields should be marked `skip_serializing_if` so that absent
/// values are left out rather than sent as `null`.
pub fn to_arguments<A: Serialize + ?Sized>(args: &A) -> Result<Arguments> {
    match serde_json::to_value(args) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(other) => Err(Error::InvalidArguments(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(Error::InvalidArguments(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Builds requests against one instance and classifies its responses.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    base_address: String,
}

impl Dispatcher {
    /// `base_address` must already be normalized.
    pub fn new(base_address: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
        }
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }

    /// Build a URL for an API endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_address,
            endpoint.trim_start_matches('/')
        )
    }

    /// Build the request for one call.
    ///
    /// The caller's map is copied, never mutated. A present token always
    /// wins over a caller-supplied `i`.
    pub fn build(
        &self,
        endpoint: &str,
        arguments: &Arguments,
        method: HttpMethod,
        token: Option<&str>,
    ) -> ApiRequest {
        let mut body = arguments.clone();
        if let Some(token) = token {
            body.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        }

        ApiRequest {
            method,
            url: self.endpoint_url(endpoint),
            body: Value::Object(body),
            endpoint: endpoint.trim_start_matches('/').to_string(),
        }
    }

    /// Classify a response.
    ///
    /// `Ok(None)` means 204 No Content; the body is not inspected.
    pub fn classify(&self, endpoint: &str, response: RawResponse) -> Result<Option<Value>> {
        tracing::debug!(endpoint, status = response.status, "API response");

        if response.status == 204 {
            return Ok(None);
        }

        if response.is_success() {
            return serde_json::from_slice(&response.body)
                .map(Some)
                .map_err(|e| Error::ResponseFormat {
                    status: response.status,
                    message: e.to_string(),
                });
        }

        let err = ApiError::from_body(response.status, &response.body);
        tracing::debug!(endpoint, code = %err.code, "API error");
        Err(Error::Api(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new("https://misskey.example.com")
    }

    #[test]
    fn builds_endpoint_url() {
        let d = dispatcher();
        assert_eq!(d.endpoint_url("notes/create"), "https://misskey.example.com/api/notes/create");
        assert_eq!(d.endpoint_url("/meta"), "https://misskey.example.com/api/meta");
    }

    #[test]
    fn injects_token_without_mutating_arguments() {
        let mut args = Arguments::new();
        args.insert("text".into(), json!("hello"));
        let before = args.clone();

        let req = dispatcher().build("notes/create", &args, HttpMethod::Post, Some("secret"));

        assert_eq!(args, before);
        assert_eq!(req.body, json!({"text": "hello", "i": "secret"}));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.endpoint, "notes/create");
    }

    #[test]
    fn token_overrides_caller_supplied_key() {
        let mut args = Arguments::new();
        args.insert(TOKEN_KEY.into(), json!("forged"));
        let req = dispatcher().build("i", &args, HttpMethod::Post, Some("real"));
        assert_eq!(req.body[TOKEN_KEY], "real");
    }

    #[test]
    fn no_token_leaves_body_alone() {
        let req = dispatcher().build("meta", &Arguments::new(), HttpMethod::Get, None);
        assert_eq!(req.body, json!({}));
    }

    #[test]
    fn no_content_skips_parsing() {
        let out = dispatcher()
            .classify("notes/delete", RawResponse::new(204, "not json at all"))
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn success_with_json() {
        let out = dispatcher()
            .classify("meta", RawResponse::new(200, r#"{"uri":"x"}"#))
            .unwrap();
        assert_eq!(out, Some(json!({"uri": "x"})));
    }

    #[test]
    fn success_with_garbage_is_format_error() {
        let err = dispatcher()
            .classify("meta", RawResponse::new(200, "<html>"))
            .unwrap_err();
        assert!(matches!(err, Error::ResponseFormat { status: 200, .. }));
    }

    #[test]
    fn failure_becomes_api_error() {
        let body = r#"{"error":{"code":"NO_SUCH_NOTE","message":"No such note.","id":"490be23f-8c1f-4796-819f-94cb4f9d1630"}}"#;
        let err = dispatcher()
            .classify("notes/show", RawResponse::new(400, body))
            .unwrap_err();
        match err {
            Error::Api(e) => {
                assert_eq!(e.status, 400);
                assert_eq!(e.code, "NO_SUCH_NOTE");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        user_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
        reply_id: Option<String>,
    }

    #[test]
    fn to_arguments_camel_cases_and_skips_absent() {
        let args = to_arguments(&Sample {
            user_id: "abc".into(),
            limit: None,
            reply_id: None,
        })
        .unwrap();
        assert_eq!(Value::Object(args), json!({"userId": "abc", "replyId": null}));
    }

    #[test]
    fn to_arguments_rejects_non_objects() {
        assert!(matches!(
            to_arguments(&[1, 2, 3]).unwrap_err(),
            Error::InvalidArguments(_)
        ));
    }
}
