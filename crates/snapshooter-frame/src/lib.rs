//! `multipart/x-mixed-replace` segmentation and frame extraction.
//!
//! An MJPEG body is a sequence of parts separated by `--<boundary>`:
//! - MIME-style header lines
//! - A blank line (`\r\n\r\n`)
//! - The raw image bytes
//!
//! [`MultipartDecoder`] accumulates arbitrary chunks and hands back complete
//! [`Frame`]s in stream order. Chunk boundaries never matter.

pub mod boundary;
pub mod decoder;
pub mod error;
pub mod part;
pub mod reader;
pub mod writer;

pub use boundary::Boundary;
pub use decoder::{DecoderConfig, MultipartDecoder, DEFAULT_MAX_BUFFER};
pub use error::{FrameError, Result};
pub use part::{parse_part, Frame, HEADER_SEPARATOR};
pub use reader::MultipartReader;
pub use writer::{encode_part, MultipartWriter};
