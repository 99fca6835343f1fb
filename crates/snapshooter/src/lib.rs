//! Extract JPEG frames from MJPEG camera streams.
//!
//! snapshooter turns a `multipart/x-mixed-replace` HTTP response into a
//! sequence of still images and keeps the most recent one available, no
//! matter how the network slices the body or how often the camera drops.
//!
//! # Crate Structure
//!
//! - [`split`]: Delimiter splitting over byte buffers
//! - [`frame`]: Multipart boundary handling and frame extraction
//! - [`source`]: Byte source abstraction and the HTTP client
//! - [`stream`]: Self-healing frame stream (behind `stream` feature)

/// Re-export split types.
pub mod split {
    pub use snapshooter_split::*;
}

/// Re-export frame types.
pub mod frame {
    pub use snapshooter_frame::*;
}

/// Re-export source types.
pub mod source {
    pub use snapshooter_source::*;
}

/// Re-export stream types (requires `stream` feature).
#[cfg(feature = "stream")]
pub mod stream {
    pub use snapshooter_stream::*;
}
