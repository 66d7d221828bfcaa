//! Announcements API.

use std::borrow::Cow;

use serde::Serialize;

use super::{Endpoint, Page};
use crate::client::Misskey;
use crate::error::Result;
use crate::types::Announcement;

/// `announcements`: list instance announcements.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAnnouncements {
    #[serde(flatten)]
    pub page: Page,
    /// Only announcements that are still active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Endpoint for ListAnnouncements {
    type Response = Vec<Announcement>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("announcements")
    }
}

/// Announcements API client.
pub struct AnnouncementsApi {
    client: Misskey,
}

impl AnnouncementsApi {
    pub(crate) fn new(client: Misskey) -> Self {
        Self { client }
    }

    /// List announcements.
    pub async fn list(&self, request: ListAnnouncements) -> Result<Vec<Announcement>> {
        self.client.call(&request).await
    }

    /// List only active announcements.
    pub async fn active(&self) -> Result<Vec<Announcement>> {
        self.list(ListAnnouncements {
            is_active: Some(true),
            ..Default::default()
        })
        .await
    }
}
