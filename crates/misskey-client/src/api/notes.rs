//! Notes API.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Endpoint, Page};
use crate::client::Misskey;
use crate::decode::Entity;
use crate::error::Result;
use crate::types::{Note, ReactionAcceptance, Visibility};

/// Poll attached to a new note.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollInput {
    pub choices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    /// Absolute deadline.
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<Utc>>,
    /// Deadline relative to posting, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_after: Option<u64>,
}

/// `notes/create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Content warning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Recipients for `specified` visibility.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub visible_user_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_acceptance: Option<ReactionAcceptance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renote_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<PollInput>,
}

impl CreateNote {
    /// A public note with just text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// A pure renote of `note_id`.
    pub fn renote(note_id: impl Into<String>) -> Self {
        Self {
            renote_id: Some(note_id.into()),
            ..Default::default()
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn with_cw(mut self, cw: impl Into<String>) -> Self {
        self.cw = Some(cw.into());
        self
    }

    pub fn reply_to(mut self, note_id: impl Into<String>) -> Self {
        self.reply_id = Some(note_id.into());
        self
    }

    pub fn with_files<I, S>(mut self, file_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_ids = file_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_poll(mut self, poll: PollInput) -> Self {
        self.poll = Some(poll);
        self
    }

    pub fn with_reaction_acceptance(mut self, acceptance: ReactionAcceptance) -> Self {
        self.reaction_acceptance = Some(acceptance);
        self
    }

    pub fn local_only(mut self) -> Self {
        self.local_only = Some(true);
        self
    }
}

/// Response of `notes/create`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteResponse {
    pub created_note: Note,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entity for CreateNoteResponse {
    const NAME: &'static str = "CreateNoteResponse";
}

impl Endpoint for CreateNote {
    type Response = CreateNoteResponse;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("notes/create")
    }
}

/// `notes/show`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowNote {
    pub note_id: String,
}

impl Endpoint for ShowNote {
    type Response = Note;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("notes/show")
    }
}

/// `notes/delete`. Answers 204 No Content.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNote {
    pub note_id: String,
}

impl Endpoint for DeleteNote {
    type Response = ();

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("notes/delete")
    }
}

/// `notes/timeline`: the home timeline of the token's owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(flatten)]
    pub page: Page,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub since_date: Option<DateTime<Utc>>,
    #[serde(
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub until_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_renotes: Option<bool>,
}

impl Endpoint for Timeline {
    type Response = Vec<Note>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("notes/timeline")
    }
}

/// `notes/local-timeline`. Same options as [`Timeline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LocalTimeline(pub Timeline);

impl Endpoint for LocalTimeline {
    type Response = Vec<Note>;

    fn path(&self) -> Cow<'_, str> {
        Cow::Borrowed("notes/local-timeline")
    }
}

/// Notes API client.
pub struct NotesApi {
    client: Misskey,
}

impl NotesApi {
    pub(crate) fn new(client: Misskey) -> Self {
        Self { client }
    }

    /// Post a note.
    pub async fn create(&self, request: CreateNote) -> Result<Note> {
        let response = self.client.call(&request).await?;
        Ok(response.created_note)
    }

    /// Post a note with just text (convenience method).
    pub async fn post(&self, text: impl Into<String>) -> Result<Note> {
        self.create(CreateNote::new(text)).await
    }

    /// Get a note by ID.
    pub async fn show(&self, note_id: &str) -> Result<Note> {
        self.client
            .call(&ShowNote {
                note_id: note_id.to_string(),
            })
            .await
    }

    /// Delete a note.
    pub async fn delete(&self, note_id: &str) -> Result<()> {
        self.client
            .call(&DeleteNote {
                note_id: note_id.to_string(),
            })
            .await
    }

    /// Home timeline.
    pub async fn timeline(&self, request: Timeline) -> Result<Vec<Note>> {
        self.client.call(&request).await
    }

    /// Local timeline.
    pub async fn local_timeline(&self, request: Timeline) -> Result<Vec<Note>> {
        self.client.call(&LocalTimeline(request)).await
    }
}
