//! Self-healing MJPEG frame stream.
//!
//! This is the "just works" layer. Point a [`FrameStream`] at a source and
//! it keeps the latest decoded frame available, reconnecting forever:
//! - Request errors, stream end and 3 s of silence all lead to a retry
//! - Retries wait a fixed 5 s and never give up
//! - Frames are published in stream order, most recent value wins
//!
//! Only [`FrameStreamHandle::shutdown`] stops it.

pub mod config;
#[cfg(feature = "http")]
pub mod connect;
pub mod error;
pub mod state;
pub mod stream;

pub use config::{StreamConfig, DEFAULT_IDLE_TIMEOUT, DEFAULT_RETRY_DELAY};
#[cfg(feature = "http")]
pub use connect::{stream_url, stream_url_with_config};
pub use error::StreamError;
pub use snapshooter_frame::Frame;
pub use state::{ConnectionState, StatsSnapshot};
pub use stream::{FrameStream, FrameStreamHandle};
