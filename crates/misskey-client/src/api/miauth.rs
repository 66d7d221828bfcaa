//! MiAuth: browser-approved token issuance.
//!
//! The app sends the user to [`MiAuthSession::authorize_url`], the user
//! approves in the browser, and the app polls `miauth/{session}/check` until
//! it reports `ok` with a token.

use std::borrow::Cow;

use serde::Serialize;
use url::Url;
use uuid::Uuid;

use super::Endpoint;
use crate::client::Misskey;
use crate::error::{Error, Result};
use crate::types::MiAuthResult;

/// A permission an app can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ReadAccount,
    WriteAccount,
    ReadBlocks,
    WriteBlocks,
    ReadDrive,
    WriteDrive,
    ReadFavorites,
    WriteFavorites,
    ReadFollowing,
    WriteFollowing,
    ReadMutes,
    WriteMutes,
    WriteNotes,
    ReadNotifications,
    WriteNotifications,
    ReadReactions,
    WriteReactions,
    WriteVotes,
    ReadChannels,
    WriteChannels,
}

impl Permission {
    /// Wire name, e.g. `write:notes`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadAccount => "read:account",
            Permission::WriteAccount => "write:account",
            Permission::ReadBlocks => "read:blocks",
            Permission::WriteBlocks => "write:blocks",
            Permission::ReadDrive => "read:drive",
            Permission::WriteDrive => "write:drive",
            Permission::ReadFavorites => "read:favorites",
            Permission::WriteFavorites => "write:favorites",
            Permission::ReadFollowing => "read:following",
            Permission::WriteFollowing => "write:following",
            Permission::ReadMutes => "read:mutes",
            Permission::WriteMutes => "write:mutes",
            Permission::WriteNotes => "write:notes",
            Permission::ReadNotifications => "read:notifications",
            Permission::WriteNotifications => "write:notifications",
            Permission::ReadReactions => "read:reactions",
            Permission::WriteReactions => "write:reactions",
            Permission::WriteVotes => "write:votes",
            Permission::ReadChannels => "read:channels",
            Permission::WriteChannels => "write:channels",
        }
    }
}

/// One MiAuth authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiAuthSession {
    pub session_id: String,
    /// App name shown to the user.
    pub name: String,
    pub icon: Option<String>,
    /// Where the browser goes after approval.
    pub callback: Option<String>,
    pub permissions: Vec<Permission>,
}

impl MiAuthSession {
    /// New session with a random ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name)
    }

    pub fn with_id(session_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            name: name.into(),
            icon: None,
            callback: None,
            permissions: Vec::new(),
        }
    }

    pub fn icon(mut self, url: impl Into<String>) -> Self {
        self.icon = Some(url.into());
        self
    }

    pub fn callback(mut self, url: impl Into<String>) -> Self {
        self.callback = Some(url.into());
        self
    }

    pub fn permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Browser URL the user must visit, for an already-normalized base address.
    pub fn authorize_url(&self, base_address: &str) -> Result<String> {
        let mut url = Url::parse(&format!("{base_address}/miauth/"))
            .and_then(|base| base.join(&self.session_id))
            .map_err(|e| Error::InvalidAddress(format!("{base_address}: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("name", &self.name);
            if let Some(icon) = &self.icon {
                query.append_pair("icon", icon);
            }
            if let Some(callback) = &self.callback {
                query.append_pair("callback", callback);
            }
            if !self.permissions.is_empty() {
                let permission = self
                    .permissions
                    .iter()
                    .map(Permission::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                query.append_pair("permission", &permission);
            }
        }

        Ok(url.into())
    }

    pub fn check_request(&self) -> CheckMiAuth {
        CheckMiAuth {
            session_id: self.session_id.clone(),
        }
    }
}

/// `miauth/{session}/check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckMiAuth {
    #[serde(skip)]
    pub session_id: String,
}

impl Endpoint for CheckMiAuth {
    type Response = MiAuthResult;

    fn path(&self) -> Cow<'_, str> {
        Cow::Owned(format!("miauth/{}/check", self.session_id))
    }
}

/// MiAuth API client.
pub struct MiAuthApi {
    client: Misskey,
}

impl MiAuthApi {
    pub(crate) fn new(client: Misskey) -> Self {
        Self { client }
    }

    /// Browser URL for `session` on this client's instance.
    pub fn authorize_url(&self, session: &MiAuthSession) -> Result<String> {
        session.authorize_url(self.client.base_address())
    }

    /// Poll the session once.
    pub async fn check(&self, session: &MiAuthSession) -> Result<MiAuthResult> {
        self.client.call(&session.check_request()).await
    }

    /// Poll the session and, once approved, verify and install the token.
    ///
    /// Returns `false` while the user has not approved yet.
    pub async fn complete(&self, session: &MiAuthSession) -> Result<bool> {
        let result = self.check(session).await?;
        match (result.ok, result.token) {
            (true, Some(token)) => {
                self.client.set_token(token).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_authorize_url() {
        let session = MiAuthSession::with_id("abc-123", "My App")
            .callback("https://app.example/cb?x=1")
            .permissions([Permission::ReadAccount, Permission::WriteNotes]);
        let url = session.authorize_url("https://misskey.example.com").unwrap();
        assert_eq!(
            url,
            "https://misskey.example.com/miauth/abc-123?name=My+App&callback=https%3A%2F%2Fapp.example%2Fcb%3Fx%3D1&permission=read%3Aaccount%2Cwrite%3Anotes"
        );
    }

    #[test]
    fn random_session_ids_differ() {
        assert_ne!(MiAuthSession::new("a").session_id, MiAuthSession::new("a").session_id);
    }

    #[test]
    fn check_path_embeds_session() {
        let check = MiAuthSession::with_id("s1", "app").check_request();
        assert_eq!(check.path(), "miauth/s1/check");
        assert!(check.arguments().unwrap().is_empty());
    }
}
