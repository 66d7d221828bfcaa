//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::{
    AccountApi, AnnouncementsApi, DriveApi, Endpoint, MetaApi, MiAuthApi, NotesApi, UsersApi,
};
use crate::config::ClientConfig;
use crate::credentials::{self, CredentialStore, VERIFY_ENDPOINT};
use crate::decode::Decode;
use crate::dispatch::{Arguments, Dispatcher};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpMethod};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::UserDetailed;

/// Async Misskey API client.
///
/// Cheap to clone; clones share the connection pool and the token.
///
/// # Example
///
/// ```no_run
/// use misskey_client::{Misskey, api::CreateNote};
///
/// # async fn example() -> misskey_client::Result<()> {
/// let client = Misskey::builder()
///     .address("misskey.example.com")
///     .token("secret")
///     .connect()
///     .await?;
///
/// let note = client.notes().create(CreateNote::new("Hello!")).await?;
/// println!("posted {}", note.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Misskey {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
struct ClientInner {
    dispatcher: Dispatcher,
    transport: Arc<dyn Transport>,
    credentials: CredentialStore,
}

impl Misskey {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Anonymous client for an address, with default settings.
    pub fn new(address: &str) -> Result<Self> {
        Self::builder().address(address).build()
    }

    /// Normalized `scheme://host[:port]` of the instance.
    pub fn base_address(&self) -> &str {
        self.inner.dispatcher.base_address()
    }

    /// Current token, if any. Never touches the network.
    pub fn token(&self) -> Option<String> {
        self.inner.credentials.get()
    }

    /// Verify `token` against the server and install it.
    ///
    /// On any failure, including cancellation of the returned future, the
    /// previous token stays in place. A 401/403 from the server yields
    /// [`Error::AuthorizationFailed`].
    pub async fn set_token(&self, token: impl Into<String>) -> Result<UserDetailed> {
        let token = token.into();
        credentials::validate_shape(&token)?;

        let request = self.inner.dispatcher.build(
            VERIFY_ENDPOINT,
            &Arguments::new(),
            HttpMethod::Post,
            Some(&token),
        );
        let user = credentials::check_verification(
            self.send(request).await.and_then(UserDetailed::decode),
        )?;

        self.inner.credentials.install(token);
        tracing::info!(user = %user.acct(), "Token verified");
        Ok(user)
    }

    /// Drop the token; later calls are anonymous.
    pub fn clear_token(&self) {
        self.inner.credentials.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the instance metadata API.
    pub fn meta(&self) -> MetaApi {
        MetaApi::new(self.clone())
    }

    /// Access the current-account API.
    pub fn account(&self) -> AccountApi {
        AccountApi::new(self.clone())
    }

    /// Access the notes API.
    pub fn notes(&self) -> NotesApi {
        NotesApi::new(self.clone())
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the drive API.
    pub fn drive(&self) -> DriveApi {
        DriveApi::new(self.clone())
    }

    /// Access the announcements API.
    pub fn announcements(&self) -> AnnouncementsApi {
        AnnouncementsApi::new(self.clone())
    }

    /// Access the MiAuth API.
    pub fn miauth(&self) -> MiAuthApi {
        MiAuthApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a typed endpoint.
    pub async fn call<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response> {
        let arguments = endpoint.arguments()?;
        let body = self.invoke(&endpoint.path(), &arguments, E::METHOD).await?;
        <E::Response as Decode>::decode(body)
    }

    /// POST to an endpoint and decode the response.
    pub async fn request<T: Decode>(&self, endpoint: &str, arguments: &Arguments) -> Result<T> {
        let body = self.invoke(endpoint, arguments, HttpMethod::Post).await?;
        T::decode(body)
    }

    /// Call an endpoint with raw arguments.
    ///
    /// Returns `None` for 204 No Content. `arguments` is not modified; the
    /// token, if set, is added to a copy.
    pub async fn invoke(
        &self,
        endpoint: &str,
        arguments: &Arguments,
        method: HttpMethod,
    ) -> Result<Option<Value>> {
        let token = self.inner.credentials.get();
        let request = self
            .inner
            .dispatcher
            .build(endpoint, arguments, method, token.as_deref());
        self.send(request).await
    }

    async fn send(&self, request: ApiRequest) -> Result<Option<Value>> {
        let endpoint = request.endpoint.clone();
        tracing::debug!(endpoint = %endpoint, method = ?request.method, "API request");
        let response = self.inner.transport.send(request).await?;
        self.inner.dispatcher.classify(&endpoint, response)
    }
}

impl std::fmt::Debug for Misskey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Misskey")
            .field("base_address", &self.base_address())
            .field("credentials", &self.inner.credentials)
            .finish()
    }
}

/// Builder for creating a [`Misskey`] client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `MISSKEY_ADDRESS` / `MISSKEY_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            config: ClientConfig::from_env(),
            transport: None,
        }
    }

    /// Set the instance address (host or URL).
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = Some(address.into());
        self
    }

    /// Set a token to verify in [`connect`](Self::connect).
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Use a custom transport instead of the default reqwest client.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build an anonymous client.
    ///
    /// Fails if a token was supplied: tokens are only installed after
    /// verification, use [`connect`](Self::connect) instead.
    pub fn build(self) -> Result<Misskey> {
        if self.config.token.is_some() {
            return Err(Error::Config(
                "a token was supplied; use connect() to verify it".to_string(),
            ));
        }
        self.build_anonymous()
    }

    /// Build the client and, if a token was supplied, verify and install it.
    pub async fn connect(mut self) -> Result<Misskey> {
        let token = self.config.token.take();
        let client = self.build_anonymous()?;
        if let Some(token) = token {
            client.set_token(token).await?;
        }
        Ok(client)
    }

    fn build_anonymous(self) -> Result<Misskey> {
        let base_address = self.config.base_address()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::build(
                &self.config.user_agent(),
                self.config.timeout,
            )?),
        };

        Ok(Misskey {
            inner: Arc::new(ClientInner {
                dispatcher: Dispatcher::new(base_address),
                transport,
                credentials: CredentialStore::new(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RawResponse;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Replays canned responses and records what was sent.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        responses: Mutex<Vec<RawResponse>>,
        sent: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<RawResponse>) -> (Self, Arc<Mutex<Vec<ApiRequest>>>) {
            let sent = Arc::new(Mutex::new(Vec::new()));
            let mut responses = responses;
            responses.reverse();
            (
                Self {
                    responses: Mutex::new(responses),
                    sent: sent.clone(),
                },
                sent,
            )
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
            self.sent.lock().push(request);
            self.responses
                .lock()
                .pop()
                .ok_or_else(|| Error::Network("no scripted response".to_string()))
        }
    }

    fn me() -> RawResponse {
        RawResponse::new(
            200,
            json!({
                "id": "u1",
                "username": "alice",
                "createdAt": "2023-01-01T00:00:00Z",
                "followersCount": 0,
                "followingCount": 0,
                "notesCount": 0,
                "isLocked": false,
                "pinnedNoteIds": [],
                "fields": []
            })
            .to_string(),
        )
    }

    /// Answers the first request, then never answers again.
    #[derive(Debug)]
    struct StallAfterFirst {
        first: Mutex<Option<RawResponse>>,
    }

    #[async_trait]
    impl Transport for StallAfterFirst {
        async fn send(&self, _request: ApiRequest) -> Result<RawResponse> {
            let first = self.first.lock().take();
            match first {
                Some(response) => Ok(response),
                None => std::future::pending().await,
            }
        }
    }

    fn client(responses: Vec<RawResponse>) -> (Misskey, Arc<Mutex<Vec<ApiRequest>>>) {
        let (transport, sent) = ScriptedTransport::new(responses);
        let client = Misskey::builder()
            .address("misskey.example.com")
            .transport(transport)
            .build()
            .unwrap();
        (client, sent)
    }

    #[test]
    fn test_builder_requires_address() {
        assert!(matches!(
            ClientBuilder::new().build().unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn test_builder_normalizes_address() {
        let client = Misskey::new("https://misskey.example.com/").unwrap();
        assert_eq!(client.base_address(), "https://misskey.example.com");
    }

    #[test]
    fn test_builder_rejects_bad_scheme() {
        assert!(matches!(
            Misskey::new("ssh://misskey.example.com").unwrap_err(),
            Error::InvalidAddress(_)
        ));
    }

    #[test]
    fn test_build_refuses_unverified_token() {
        let err = Misskey::builder()
            .address("misskey.example.com")
            .token("secret")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_set_token_installs_after_verification() {
        let (client, sent) = client(vec![me()]);
        let user = client.set_token("good").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(client.token().as_deref(), Some("good"));

        let sent = sent.lock();
        assert_eq!(sent[0].url, "https://misskey.example.com/api/i");
        assert_eq!(sent[0].body, json!({"i": "good"}));
    }

    #[tokio::test]
    async fn test_rejected_token_keeps_previous() {
        let denied = RawResponse::new(
            401,
            r#"{"error":{"code":"CREDENTIAL_REQUIRED","message":"Credential required.","id":"1384574d-a912-4b81-8601-c7b1c4085df1"}}"#,
        );
        let (client, _) = client(vec![me(), denied]);
        client.set_token("good").await.unwrap();

        let err = client.set_token("bad").await.unwrap_err();
        assert!(matches!(err, Error::AuthorizationFailed { status: 401, .. }));
        assert_eq!(client.token().as_deref(), Some("good"));
    }

    #[tokio::test]
    async fn test_cancelled_verification_keeps_previous_token() {
        let client = Misskey::builder()
            .address("misskey.example.com")
            .transport(StallAfterFirst {
                first: Mutex::new(Some(me())),
            })
            .build()
            .unwrap();
        client.set_token("old").await.unwrap();

        let outcome =
            tokio::time::timeout(Duration::from_millis(50), client.set_token("new")).await;

        assert!(outcome.is_err());
        assert_eq!(client.token().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_network_failure_during_verification_keeps_absence() {
        let (client, _) = client(vec![]);
        let err = client.set_token("any").await.unwrap_err();
        assert!(err.is_network_error());
        assert_eq!(client.token(), None);
    }

    #[tokio::test]
    async fn test_invoke_injects_token_and_handles_no_content() {
        let (client, sent) = client(vec![me(), RawResponse::new(204, "")]);
        client.set_token("tok").await.unwrap();

        let mut args = Arguments::new();
        args.insert("noteId".into(), json!("n1"));
        let out = client
            .invoke("notes/delete", &args, HttpMethod::Post)
            .await
            .unwrap();

        assert!(out.is_none());
        assert_eq!(args.get("i"), None);
        assert_eq!(sent.lock()[1].body, json!({"noteId": "n1", "i": "tok"}));
    }

    #[tokio::test]
    async fn test_clear_token_makes_calls_anonymous() {
        let (client, sent) = client(vec![me(), RawResponse::new(200, "{}")]);
        client.set_token("tok").await.unwrap();
        client.clear_token();

        let _: Option<Value> = client.request("ping", &Arguments::new()).await.unwrap();
        assert_eq!(sent.lock()[1].body, json!({}));
    }
}
