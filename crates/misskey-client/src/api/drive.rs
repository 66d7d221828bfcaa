//! Drive API.

use std::borrow::Cow;

use serde::Serialize;

use super::{Endpoint, Page};
use crate::client::Misskey;
use crate::error::Result;
use crate::types::{DriveFile, DriveFolder};

/// `drive/files`: list files in a folder (root when `folder_id` is `None`).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFiles {
    #[serde(flatten)]
    pub page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    /// MIME type filter, e.g. `image/*`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Endpoint for ListFiles {
    type Response = Vec<DriveFile>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("drive/files")
    }
}

/// `drive/files/show`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowFile {
    pub file_id: String,
}

impl Endpoint for ShowFile {
    type Response = DriveFile;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("drive/files/show")
    }
}

/// `drive/folders`: list subfolders.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFolders {
    #[serde(flatten)]
    pub page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

impl Endpoint for ListFolders {
    type Response = Vec<DriveFolder>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("drive/folders")
    }
}

/// Drive API client.
pub struct DriveApi {
    client: Misskey,
}

impl DriveApi {
    pub(crate) fn new(client: Misskey) -> Self {
        Self { client }
    }

    /// List files.
    pub async fn files(&self, request: ListFiles) -> Result<Vec<DriveFile>> {
        self.client.call(&request).await
    }

    /// Get a file by ID.
    pub async fn file(&self, file_id: &str) -> Result<DriveFile> {
        self.client
            .call(&ShowFile {
                file_id: file_id.to_string(),
            })
            .await
    }

    /// List folders.
    pub async fn folders(&self, request: ListFolders) -> Result<Vec<DriveFolder>> {
        self.client.call(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn list_files_flattens_page() {
        let request = ListFiles {
            page: Page::limit(5),
            content_type: Some("image/*".into()),
            ..Default::default()
        };
        assert_eq!(
            Value::Object(request.arguments().unwrap()),
            json!({"limit": 5, "type": "image/*"})
        );
    }
}
