//! # pixvault
//!
//! Async client for the PixVault image-hosting API.
//!
//! The API is batch-oriented: a request is an ordered JSON array of action
//! objects and the response is an ordered array of result envelopes, where
//! the i-th envelope belongs to the i-th action. This crate models that
//! contract directly: you queue actions on a [`Client`], run them as one
//! batch, and get the settled actions back. Asynchronous image creates are
//! reconciled automatically: their job handle is polled until the job
//! finishes, and the final job result settles the original action.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pixvault::{Client, RunOptions};
//! use pixvault::actions::{AccountInfoParams, ImageCreateParams, ImageSource};
//!
//! #[tokio::main]
//! async fn main() -> pixvault::Result<()> {
//!     let mut client = Client::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     client.account_info(AccountInfoParams::new().storage(true));
//!     client
//!         .image_create(
//!             ImageCreateParams::new("cat-1", ImageSource::Url("https://example.com/cat.jpg".into()))
//!                 .public(true)
//!                 .asynchronous(true),
//!         )
//!         .await?;
//!
//!     // Waits for the asynchronous upload by polling its job.
//!     let settled = client.run(RunOptions::new().wait(true)).await?;
//!     for action in &settled {
//!         println!("{}: success={}", action.id(), action.is_successful());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, enqueue methods |
//! | [`actions`] | Per-action parameter builders |
//! | [`action`] | Queued actions, outcomes, result envelopes |
//! | [`dispatch`] | Batched dispatch and the job poll loop |
//! | [`batch`] | Batch encoding and positional demultiplexing |
//! | [`codec`] | Wire-format codecs |
//! | [`transport`] | HTTP transport and status classification |

pub mod action;
pub mod actions;
pub mod batch;
pub mod client;
pub mod codec;
pub mod dispatch;
pub mod error;
pub mod transport;

pub use action::{Action, ActionHandle, ActionId, Envelope, Outcome};
pub use client::{Client, ClientBuilder};
pub use dispatch::{DispatchError, RunOptions};
pub use error::{Error, ProtocolError};
pub use transport::{HttpError, HttpErrorKind, Transport, TransportError};

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;
