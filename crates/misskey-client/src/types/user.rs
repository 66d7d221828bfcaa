use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::Entity;

/// Presence indicator shown next to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnlineStatus {
    Online,
    Active,
    Offline,
    Unknown,
}

/// Compact user embedded in notes and other entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLite {
    pub id: String,
    pub username: String,
    /// `None` for local users.
    #[serde(default)]
    pub host: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub avatar_blurhash: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_cat: bool,
    #[serde(default)]
    pub online_status: Option<OnlineStatus>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for UserLite {
    const NAME: &'static str = "UserLite";
}

/// Profile field shown on a user's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileField {
    pub name: String,
    pub value: String,
}

/// Full user profile, as returned by `i` and `users/show`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailed {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub avatar_blurhash: Option<String>,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_cat: bool,
    #[serde(default)]
    pub online_status: Option<OnlineStatus>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "super::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// `YYYY-MM-DD`, as entered by the user.
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub banner_url: Option<String>,
    pub is_locked: bool,
    pub followers_count: u64,
    pub following_count: u64,
    pub notes_count: u64,
    pub pinned_note_ids: Vec<String>,
    pub fields: Vec<ProfileField>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for UserDetailed {
    const NAME: &'static str = "UserDetailed";
}

impl UserDetailed {
    /// `@username@host`, or `@username` for local users.
    pub fn acct(&self) -> String {
        match &self.host {
            Some(host) => format!("@{}@{}", self.username, host),
            None => format!("@{}", self.username),
        }
    }
}
