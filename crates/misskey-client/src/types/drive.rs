use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::Entity;

/// A file stored in a user's drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub content_type: String,
    pub md5: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(default)]
    pub is_sensitive: bool,
    #[serde(default)]
    pub blurhash: Option<String>,
    #[serde(default)]
    pub properties: DriveFileProperties,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for DriveFile {
    const NAME: &'static str = "DriveFile";
}

/// Media properties; all optional since non-images carry none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileProperties {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// EXIF orientation.
    #[serde(default)]
    pub orientation: Option<u8>,
    #[serde(default)]
    pub avg_color: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFolder {
    pub id: String,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub folders_count: Option<u64>,
    #[serde(default)]
    pub files_count: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for DriveFolder {
    const NAME: &'static str = "DriveFolder";
}
