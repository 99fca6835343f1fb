use std::io::{ErrorKind, Read};

use crate::boundary::Boundary;
use crate::decoder::{DecoderConfig, MultipartDecoder};
use crate::error::{FrameError, Result};
use crate::part::Frame;

const READ_CHUNK_SIZE: usize = 16 * 1024;

/// Reads complete frames from any `Read` stream carrying a multipart body.
///
/// Partial reads are handled internally; callers always get complete frames.
pub struct MultipartReader<T> {
    inner: T,
    decoder: MultipartDecoder,
}

impl<T: Read> MultipartReader<T> {
    /// Create a new reader with default decoder configuration.
    pub fn new(inner: T, boundary: Boundary) -> Self {
        Self::with_config(inner, boundary, DecoderConfig::default())
    }

    /// Create a new reader with explicit decoder configuration.
    pub fn with_config(inner: T, boundary: Boundary, config: DecoderConfig) -> Self {
        Self {
            inner,
            decoder: MultipartDecoder::with_config(boundary, config),
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached. A
    /// trailing part that is not followed by a delimiter is never returned.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            if let Some(frame) = self.decoder.next_frame()? {
                return Ok(frame);
            }

            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.decoder.push(&chunk[..read]);
        }
    }

    /// Iterate frames until EOF or the first error.
    ///
    /// EOF ends the iteration; any other error is yielded once, then the
    /// iterator is exhausted.
    pub fn frames(&mut self) -> Frames<'_, T> {
        Frames {
            reader: self,
            done: false,
        }
    }

    /// The underlying decoder.
    pub fn decoder(&self) -> &MultipartDecoder {
        &self.decoder
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Iterator returned by [`MultipartReader::frames`].
pub struct Frames<'r, T> {
    reader: &'r mut MultipartReader<T>,
    done: bool,
}

impl<T: Read> Iterator for Frames<'_, T> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(FrameError::ConnectionClosed) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
