//! API endpoint implementations.
//!
//! Each endpoint is a request struct implementing [`Endpoint`]. Both client
//! flavours can execute any of them with `call`; the async client also
//! groups them into category accessors (`client.notes().create(..)`).

use std::borrow::Cow;

use serde::Serialize;

use crate::decode::Decode;
use crate::dispatch::{to_arguments, Arguments};
use crate::error::Result;
use crate::http::HttpMethod;

mod account;
mod announcements;
mod drive;
mod meta;
mod miauth;
mod notes;
mod users;

pub use account::{AccountApi, I};
pub use announcements::{AnnouncementsApi, ListAnnouncements};
pub use drive::{DriveApi, ListFiles, ListFolders, ShowFile};
pub use meta::{GetMeta, MetaApi};
pub use miauth::{CheckMiAuth, MiAuthApi, MiAuthSession, Permission};
pub use notes::{
    CreateNote, CreateNoteResponse, DeleteNote, LocalTimeline, NotesApi, PollInput, ShowNote,
    Timeline,
};
pub use users::{ShowUser, UsersApi};

/// One server endpoint: where it lives, what it sends, what it returns.
pub trait Endpoint: Serialize {
    /// Decoded response type.
    type Response: Decode;

    /// HTTP method. Almost everything is POST.
    const METHOD: HttpMethod = HttpMethod::Post;

    /// Path below `/api/`.
    fn path(&self) -> Cow<'_, str>;

    /// Wire arguments, camelCased and with absent optionals omitted.
    fn arguments(&self) -> Result<Arguments> {
        to_arguments(self)
    }
}

/// Shared pagination arguments for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Maximum number of items (server caps at 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Only items newer than this ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_id: Option<String>,
    /// Only items older than this ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until_id: Option<String>,
}

impl Page {
    pub fn limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn until(mut self, id: impl Into<String>) -> Self {
        self.until_id = Some(id.into());
        self
    }

    pub fn since(mut self, id: impl Into<String>) -> Self {
        self.since_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn page_skips_absent_fields() {
        let args = to_arguments(&Page::limit(10).until("9abc")).unwrap();
        assert_eq!(Value::Object(args), json!({"limit": 10, "untilId": "9abc"}));
    }

    #[test]
    fn empty_page_is_empty_object() {
        assert!(to_arguments(&Page::default()).unwrap().is_empty());
    }
}
