//! Current-account API.

use std::borrow::Cow;

use serde::Serialize;

use super::Endpoint;
use crate::client::Misskey;
use crate::error::Result;
use crate::types::UserDetailed;

/// `i`: the account that owns the token.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct I;

impl Endpoint for I {
    type Response = UserDetailed;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("i")
    }
}

/// Current-account API client.
pub struct AccountApi {
    client: Misskey,
}

impl AccountApi {
    pub(crate) fn new(client: Misskey) -> Self {
        Self { client }
    }

    /// Fetch the authenticated user.
    pub async fn me(&self) -> Result<UserDetailed> {
        self.client.call(&I).await
    }
}
