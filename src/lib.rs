//! A lean CloudKit Web Services asset upload client for Rust.
//!
//! Uploading an asset is two calls: ask the service for an upload URL per
//! record field, then POST the bytes to that URL and keep the returned
//! receipt for the record save that follows.
//!
//! ## Quick start (async)
//!
//! ```no_run
//! # #[cfg(feature = "async")]
//! # async fn demo() -> Result<(), cloudkit_assets::Error> {
//! use cloudkit_assets::{Client, Database, Environment, UploadField};
//!
//! let client = Client::builder("https://api.apple-cloudkit.com")?
//!     .container("iCloud.com.example.app")
//!     .environment(Environment::Production)
//!     .build()?;
//!
//! let urls = client
//!     .assets()
//!     .upload_urls(Database::Private)
//!     .field(UploadField::new("image").record_type("Photo"))
//!     .send()
//!     .await?;
//!
//! for location in urls {
//!     let confirmation = client
//!         .assets()
//!         .upload(location.url)
//!         .body_bytes(&b"...image bytes..."[..])
//!         .send()
//!         .await?;
//!     println!("{} bytes, receipt ready", confirmation.size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick start (blocking)
//!
//! ```no_run
//! # #[cfg(feature = "blocking")]
//! # fn demo() -> Result<(), cloudkit_assets::Error> {
//! use cloudkit_assets::{BlockingClient, Database, UploadEncoding, UploadField};
//!
//! let client = BlockingClient::builder("https://api.apple-cloudkit.com")?
//!     .container("iCloud.com.example.app")
//!     .build()?;
//!
//! let urls = client
//!     .assets()
//!     .upload_urls(Database::Public)
//!     .field(UploadField::new("file").record_name("doc-1").record_type("Document"))
//!     .send()?;
//!
//! if let Some(location) = urls.get("doc-1", "file") {
//!     let confirmation = client
//!         .assets()
//!         .upload(location.url.clone())
//!         .encoding(UploadEncoding::Multipart)
//!         .body_bytes(&b"hello"[..])
//!         .send()?;
//!     println!("checksum {}", confirmation.file_checksum);
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(all(
    feature = "rustls",
    feature = "native-tls",
    not(feature = "allow-both-tls")
))]
compile_error!("Enable only one of: rustls, native-tls.");

/// Service entry points and request builders.
pub mod api;
#[cfg(feature = "providers")]
/// Endpoint presets.
pub mod providers;
/// Shared request/response types.
pub mod types;

mod client;
mod error;
mod transport;
mod util;

#[cfg(feature = "blocking")]
pub use client::{BlockingClient, BlockingClientBuilder};
pub use client::DEFAULT_ENDPOINT;
#[cfg(feature = "async")]
pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use types::{
    Database, Environment, UploadConfirmation, UploadEncoding, UploadField, UploadUrl,
    UploadUrlsOutput,
};

#[cfg(feature = "async")]
pub use tokio_util::sync::CancellationToken;
