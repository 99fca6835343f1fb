use bytes::BytesMut;
use snapshooter_split::splits;

use crate::boundary::Boundary;
use crate::error::{FrameError, Result};
use crate::part::{is_blank, parse_part, Frame};

/// Default accumulation limit: 16 MiB.
pub const DEFAULT_MAX_BUFFER: usize = 16 * 1024 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 64 * 1024;

/// Configuration for the multipart decoder.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum bytes held while waiting for the next boundary. Default: 16 MiB.
    pub max_buffer_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_buffer_size: DEFAULT_MAX_BUFFER,
        }
    }
}

/// Incremental frame extraction over an accumulation buffer.
///
/// The buffer only ever holds bytes received since the last consumed
/// boundary. Extracting a segment consumes its prefix of the buffer and
/// retains the unterminated suffix.
///
/// A boundary token occurring inside an image payload cannot be told apart
/// from a real delimiter: the payload is cut at that point and the tail is
/// handed to header parsing as a segment of its own.
#[derive(Debug)]
pub struct MultipartDecoder {
    boundary: Boundary,
    buf: BytesMut,
    config: DecoderConfig,
    // Prefix of `buf` already scanned without finding a delimiter.
    scanned: usize,
    malformed: u64,
}

impl MultipartDecoder {
    /// Create a decoder with default configuration.
    pub fn new(boundary: Boundary) -> Self {
        Self::with_config(boundary, DecoderConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(boundary: Boundary, config: DecoderConfig) -> Self {
        Self {
            boundary,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            scanned: 0,
            malformed: 0,
        }
    }

    /// Append a chunk to the accumulation buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Extract the next complete frame, if the buffer holds one.
    ///
    /// Segments without a header/body separator, or with an empty body, are
    /// skipped and counted in [`MultipartDecoder::malformed_segments`].
    /// Returns `Ok(None)` when more data is needed.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            let delimiter = self.boundary.delimiter();
            let from = self
                .scanned
                .saturating_sub(delimiter.len().saturating_sub(1));

            let found = {
                let mut iter = splits(&self.buf[from..], delimiter, Some(1));
                iter.next()
                    .map(|piece| (from + piece.len(), from + iter.consumed()))
            };

            let Some((segment_len, consumed)) = found else {
                self.scanned = self.buf.len();
                if self.buf.len() > self.config.max_buffer_size {
                    return Err(FrameError::BufferOverflow {
                        size: self.buf.len(),
                        max: self.config.max_buffer_size,
                    });
                }
                return Ok(None);
            };

            let segment = self.buf.split_to(consumed).freeze().slice(..segment_len);
            self.scanned = 0;

            if let Some(frame) = parse_part(&segment) {
                return Ok(Some(frame));
            }
            if !is_blank(&segment) {
                self.malformed += 1;
                tracing::debug!(
                    segment_len = segment.len(),
                    "skipping multipart segment without header separator"
                );
            }
        }
    }

    /// Append a chunk and drain every frame it completes, in stream order.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<Vec<Frame>> {
        self.push(chunk);

        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// The boundary this decoder splits on.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Bytes currently held while waiting for the next boundary.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Non-blank segments skipped because they carried no payload (no
    /// header separator, or nothing after it).
    pub fn malformed_segments(&self) -> u64 {
        self.malformed
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }
}
