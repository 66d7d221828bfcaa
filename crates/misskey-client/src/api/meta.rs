//! Instance metadata API.

use std::borrow::Cow;

use serde::Serialize;

use super::Endpoint;
use crate::client::Misskey;
use crate::error::Result;
use crate::types::Meta;

/// `meta`: instance metadata. Works without a token.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetMeta {
    /// Include the full feature and policy listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<bool>,
}

impl Endpoint for GetMeta {
    type Response = Meta;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("meta")
    }
}

/// Instance metadata API client.
pub struct MetaApi {
    client: Misskey,
}

impl MetaApi {
    pub(crate) fn new(client: Misskey) -> Self {
        Self { client }
    }

    /// Fetch instance metadata.
    pub async fn get(&self) -> Result<Meta> {
        self.client.call(&GetMeta::default()).await
    }

    /// Fetch instance metadata with full detail.
    pub async fn detailed(&self) -> Result<Meta> {
        self.client.call(&GetMeta { detail: Some(true) }).await
    }

    /// Simple connectivity check - returns true if the instance answers.
    pub async fn is_reachable(&self) -> bool {
        self.get().await.is_ok()
    }
}
