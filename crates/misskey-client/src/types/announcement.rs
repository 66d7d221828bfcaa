use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementIcon {
    Info,
    Warning,
    Error,
    Success,
}

/// Where the client should render an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementDisplay {
    Dialog,
    Normal,
    Banner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "super::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub icon: AnnouncementIcon,
    pub display: AnnouncementDisplay,
    pub need_confirmation_to_read: bool,
    /// Targeted at the requesting user rather than everyone.
    pub for_you: bool,
    /// Only present for authenticated requests.
    #[serde(default)]
    pub is_read: Option<bool>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for Announcement {
    const NAME: &'static str = "Announcement";
}
