//! Users API.

use std::borrow::Cow;

use serde::Serialize;

use super::Endpoint;
use crate::client::Misskey;
use crate::error::Result;
use crate::types::UserDetailed;

/// `users/show`: look a user up by ID or by username and host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Explicitly nullable: `null` means "local user".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<Option<String>>,
}

impl ShowUser {
    pub fn by_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Look up `@username` or `@username@host`.
    pub fn by_acct(acct: &str) -> Self {
        let acct = acct.trim_start_matches('@');
        let (username, host) = match acct.split_once('@') {
            Some((user, host)) => (user, Some(host.to_string())),
            None => (acct, None),
        };
        Self {
            username: Some(username.to_string()),
            host: Some(host),
            ..Default::default()
        }
    }
}

impl Endpoint for ShowUser {
    type Response = UserDetailed;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("users/show")
    }
}

/// Users API client.
pub struct UsersApi {
    client: Misskey,
}

impl UsersApi {
    pub(crate) fn new(client: Misskey) -> Self {
        Self { client }
    }

    /// Get a user by ID.
    pub async fn show(&self, user_id: &str) -> Result<UserDetailed> {
        self.client.call(&ShowUser::by_id(user_id)).await
    }

    /// Get a user by `@username[@host]`.
    pub async fn show_by_acct(&self, acct: &str) -> Result<UserDetailed> {
        self.client.call(&ShowUser::by_acct(acct)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn local_acct_sends_null_host() {
        let args = ShowUser::by_acct("@alice").arguments().unwrap();
        assert_eq!(Value::Object(args), json!({"username": "alice", "host": null}));
    }

    #[test]
    fn remote_acct_splits_host() {
        let args = ShowUser::by_acct("alice@remote.example").arguments().unwrap();
        assert_eq!(
            Value::Object(args),
            json!({"username": "alice", "host": "remote.example"})
        );
    }

    #[test]
    fn by_id_sends_only_user_id() {
        let args = ShowUser::by_id("9abc").arguments().unwrap();
        assert_eq!(Value::Object(args), json!({"userId": "9abc"}));
    }
}
