//! Typed client for the Misskey HTTP API.
//!
//! Calls are plain JSON POSTs to `{instance}/api/{endpoint}`, authenticated
//! by an `i` field in the body. This crate builds those payloads from typed
//! arguments, sends them, and decodes the responses into entities that keep
//! any fields the client does not model yet.
//!
//! # Example
//!
//! ```no_run
//! use misskey_client::{Misskey, Result};
//! use misskey_client::api::{CreateNote, Page, Timeline};
//!
//! # async fn example() -> Result<()> {
//! // Create a client and verify the token
//! let client = Misskey::builder()
//!     .address("misskey.example.com")
//!     .token("secret")
//!     .connect()
//!     .await?;
//!
//! // Instance info
//! let meta = client.meta().get().await?;
//! println!("{} running {}", meta.uri, meta.version);
//!
//! // Post and read back
//! let note = client.notes().create(CreateNote::new("Hello!")).await?;
//! let timeline = client
//!     .notes()
//!     .timeline(Timeline { page: Page::limit(10), ..Default::default() })
//!     .await?;
//! assert!(timeline.iter().any(|n| n.id == note.id));
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every failure is one [`Error`] variant: a bad address, a rejected token,
//! a transport failure, an unparseable success body, a server-reported
//! [`ApiError`], or a schema violation while decoding.
//!
//! # Blocking
//!
//! With the `blocking` feature (on by default), [`blocking::Misskey`] offers
//! the same calls without an async runtime.

pub mod address;
pub mod api;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod client;
pub mod config;
pub mod credentials;
pub mod decode;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use address::normalize_address;
pub use client::{ClientBuilder, Misskey};
pub use decode::{Decode, Entity};
pub use dispatch::Arguments;
pub use error::{ApiError, Error, ErrorId, Result};
pub use http::HttpMethod;
pub use types::*;
