use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::drive::DriveFile;
use super::user::UserLite;
use crate::decode::Entity;

/// Who can see a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Home,
    Followers,
    Specified,
}

/// Which reactions a note accepts. `None` on the note means "anything".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionAcceptance {
    LikeOnly,
    LikeOnlyForRemote,
    NonSensitiveOnly,
    NonSensitiveOnlyForLocalLikeOnlyForRemote,
}

/// A note (post).
///
/// `reply` and `renote` embed the referenced notes when the server packs
/// them. Only one level is expanded: an embedded note's own `reply` and
/// `renote` stay in its `extra` as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub user: UserLite,
    #[serde(default)]
    pub text: Option<String>,
    /// Content warning.
    #[serde(default)]
    pub cw: Option<String>,
    pub visibility: Visibility,
    pub local_only: bool,
    #[serde(default)]
    pub reaction_acceptance: Option<ReactionAcceptance>,
    pub renote_count: u64,
    pub replies_count: u64,
    /// Reaction to count.
    pub reactions: BTreeMap<String, u64>,
    /// Custom emoji name to image URL.
    pub reaction_emojis: BTreeMap<String, String>,
    pub file_ids: Vec<String>,
    pub files: Vec<DriveFile>,
    #[serde(default)]
    pub reply_id: Option<String>,
    #[serde(default)]
    pub renote_id: Option<String>,
    #[serde(default, deserialize_with = "embedded", skip_serializing_if = "Option::is_none")]
    pub reply: Option<Box<Note>>,
    #[serde(default, deserialize_with = "embedded", skip_serializing_if = "Option::is_none")]
    pub renote: Option<Box<Note>>,
    #[serde(default)]
    pub visible_user_ids: Option<Vec<String>>,
    #[serde(default)]
    pub mentions: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub poll: Option<Poll>,
    /// ActivityPub URI, for remote notes.
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub my_reaction: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for Note {
    const NAME: &'static str = "Note";
}

impl Note {
    /// A pure renote: has a renote target and no text, files or poll.
    pub fn is_pure_renote(&self) -> bool {
        self.renote_id.is_some() && self.text.is_none() && self.file_ids.is_empty() && self.poll.is_none()
    }

    /// Total number of reactions across all kinds.
    pub fn reaction_total(&self) -> u64 {
        self.reactions.values().sum()
    }
}

/// Keys of a note that refer to other embedded notes.
const EMBEDDED_KEYS: [&str; 2] = ["reply", "renote"];

/// Decode a note embedded in another note, leaving its own embedded notes
/// unexpanded in `extra`.
fn embedded<'de, D>(deserializer: D) -> Result<Option<Box<Note>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(mut value) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let mut nested = BTreeMap::new();
    if let Some(map) = value.as_object_mut() {
        for key in EMBEDDED_KEYS {
            match map.remove(key) {
                Some(Value::Null) | None => {}
                Some(raw) => {
                    nested.insert(key.to_string(), raw);
                }
            }
        }
    }

    let mut note: Note = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
    note.extra.extend(nested);
    Ok(Some(Box::new(note)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(default)]
    pub multiple: bool,
    #[serde(default, with = "super::timestamp::option")]
    pub expires_at: Option<DateTime<Utc>>,
    pub choices: Vec<PollChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollChoice {
    pub text: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub is_voted: bool,
}
