//! Entity types returned by the Misskey API.
//!
//! Field names follow the server's camelCase on the wire. Every entity keeps
//! fields it does not model in `extra`, and re-serializes them unchanged.
//!
//! Closed enumerations (`Visibility`, `ReactionAcceptance`, ...) are strict:
//! a value outside the set fails the decode.

mod announcement;
mod drive;
mod meta;
mod miauth;
mod note;
pub mod timestamp;
mod user;

pub use announcement::{Announcement, AnnouncementDisplay, AnnouncementIcon};
pub use drive::{DriveFile, DriveFileProperties, DriveFolder};
pub use meta::Meta;
pub use miauth::MiAuthResult;
pub use note::{Note, Poll, PollChoice, ReactionAcceptance, Visibility};
pub use user::{OnlineStatus, ProfileField, UserDetailed, UserLite};
