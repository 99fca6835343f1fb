//! Byte source abstraction for MJPEG streams.
//!
//! A [`Connector`] opens a fresh [`ByteSource`] on every attempt; a source
//! yields body chunks until the stream ends. Nothing is ever reused across
//! attempts.
//!
//! - [`http`]: HTTP(S) sources via reqwest (behind the `http` feature)

pub mod error;
pub mod traits;

#[cfg(feature = "http")]
pub mod http;

pub use error::{Result, SourceError};
pub use traits::{ByteSource, Connector};

#[cfg(feature = "http")]
pub use http::{redact_url, HttpConfig, HttpConnector, HttpSource};
