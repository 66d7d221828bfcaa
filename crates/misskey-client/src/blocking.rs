//! Blocking client.
//!
//! Same semantics as the async [`Misskey`](crate::Misskey); each call blocks
//! the calling thread for the duration of the HTTP round-trip. Must not be
//! used from inside an async runtime.
//!
//! ```no_run
//! use misskey_client::api::ShowNote;
//! use misskey_client::blocking::Misskey;
//!
//! # fn example() -> misskey_client::Result<()> {
//! let client = Misskey::builder()
//!     .address("misskey.example.com")
//!     .token("secret")
//!     .connect()?;
//! let note = client.call(&ShowNote { note_id: "9abc".into() })?;
//! println!("{:?}", note.text);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::Endpoint;
use crate::config::ClientConfig;
use crate::credentials::{self, CredentialStore, VERIFY_ENDPOINT};
use crate::decode::Decode;
use crate::dispatch::{Arguments, Dispatcher};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpMethod};
use crate::transport::{BlockingReqwestTransport, BlockingTransport};
use crate::types::UserDetailed;

/// Blocking Misskey API client. Clones share the connection pool and token.
#[derive(Clone)]
pub struct Misskey {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    dispatcher: Dispatcher,
    transport: Arc<dyn BlockingTransport>,
    credentials: CredentialStore,
}

impl Misskey {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Anonymous client for an address, with default settings.
    pub fn new(address: &str) -> Result<Self> {
        Self::builder().address(address).build()
    }

    pub fn base_address(&self) -> &str {
        self.inner.dispatcher.base_address()
    }

    /// Current token, if any. Never touches the network.
    pub fn token(&self) -> Option<String> {
        self.inner.credentials.get()
    }

    /// Verify `token` against the server and install it.
    ///
    /// On failure the previous token stays in place.
    pub fn set_token(&self, token: impl Into<String>) -> Result<UserDetailed> {
        let token = token.into();
        credentials::validate_shape(&token)?;

        let request = self.inner.dispatcher.build(
            VERIFY_ENDPOINT,
            &Arguments::new(),
            HttpMethod::Post,
            Some(&token),
        );
        let user =
            credentials::check_verification(self.send(request).and_then(UserDetailed::decode))?;

        self.inner.credentials.install(token);
        tracing::info!(user = %user.acct(), "Token verified");
        Ok(user)
    }

    pub fn clear_token(&self) {
        self.inner.credentials.clear();
    }

    /// Execute a typed endpoint.
    pub fn call<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response> {
        let arguments = endpoint.arguments()?;
        let body = self.invoke(&endpoint.path(), &arguments, E::METHOD)?;
        <E::Response as Decode>::decode(body)
    }

    /// POST to an endpoint and decode the response.
    pub fn request<T: Decode>(&self, endpoint: &str, arguments: &Arguments) -> Result<T> {
        let body = self.invoke(endpoint, arguments, HttpMethod::Post)?;
        T::decode(body)
    }

    /// Call an endpoint with raw arguments. Returns `None` for 204.
    pub fn invoke(
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
        self.send(request)
    }

    fn send(&self, request: ApiRequest) -> Result<Option<Value>> {
        let endpoint = request.endpoint.clone();
        tracing::debug!(endpoint = %endpoint, method = ?request.method, "API request");
        let response = self.inner.transport.send(request)?;
        self.inner.dispatcher.classify(&endpoint, response)
    }
}

impl std::fmt::Debug for Misskey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("blocking::Misskey")
            .field("base_address", &self.base_address())
            .field("credentials", &self.inner.credentials)
            .finish()
    }
}

/// Builder for a blocking [`Misskey`] client.
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn BlockingTransport>>,
}

impl ClientBuilder {
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

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = Some(address.into());
        self
    }

    /// Set a token to verify in [`connect`](Self::connect).
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    pub fn transport(mut self, transport: impl BlockingTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build an anonymous client. Fails if a token was supplied.
    pub fn build(self) -> Result<Misskey> {
        if self.config.token.is_some() {
            return Err(Error::Config(
                "a token was supplied; use connect() to verify it".to_string(),
            ));
        }
        self.build_anonymous()
    }

    /// Build the client and, if a token was supplied, verify and install it.
    pub fn connect(mut self) -> Result<Misskey> {
        let token = self.config.token.take();
        let client = self.build_anonymous()?;
        if let Some(token) = token {
            client.set_token(token)?;
        }
        Ok(client)
    }

    fn build_anonymous(self) -> Result<Misskey> {
        let base_address = self.config.base_address()?;

        let transport: Arc<dyn BlockingTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(BlockingReqwestTransport::build(
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
