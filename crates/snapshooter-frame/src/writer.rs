use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};

use crate::boundary::Boundary;
use crate::error::{FrameError, Result};
use crate::part::{Frame, HEADER_SEPARATOR};

const INITIAL_BUFFER_CAPACITY: usize = 64 * 1024;

/// Encode one part into the multipart wire format.
///
/// Wire format:
/// ```text
/// --<token>\r\n
/// Content-Type: <content_type>\r\n
/// Content-Length: <n>\r\n
/// \r\n
/// <payload>\r\n
/// ```
/// A part only becomes decodable once the next delimiter follows it.
pub fn encode_part(boundary: &Boundary, content_type: &str, payload: &[u8], dst: &mut BytesMut) {
    dst.put_slice(boundary.delimiter());
    put_part(content_type, payload, dst);
}

// Everything of a part that follows its leading delimiter.
fn put_part(content_type: &str, payload: &[u8], dst: &mut BytesMut) {
    let length = payload.len().to_string();
    dst.reserve(content_type.len() + length.len() + payload.len() + 48);
    dst.put_slice(b"\r\nContent-Type: ");
    dst.put_slice(content_type.as_bytes());
    dst.put_slice(b"\r\nContent-Length: ");
    dst.put_slice(length.as_bytes());
    dst.put_slice(HEADER_SEPARATOR);
    dst.put_slice(payload);
    dst.put_slice(b"\r\n");
}

/// Writes frames as a `multipart/x-mixed-replace` body to any `Write` stream.
pub struct MultipartWriter<T> {
    inner: T,
    boundary: Boundary,
    buf: BytesMut,
    started: bool,
}

impl<T: Write> MultipartWriter<T> {
    /// Create a new writer.
    pub fn new(inner: T, boundary: Boundary) -> Self {
        Self {
            inner,
            boundary,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            started: false,
        }
    }

    /// Write a frame, reusing its part content type when it has one.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(
            frame.content_type().unwrap_or("image/jpeg"),
            frame.payload.as_ref(),
        )
    }

    /// Encode and write one part.
    ///
    /// The delimiter is written right after the part so readers can decode
    /// it without waiting for the next one.
    pub fn send(&mut self, content_type: &str, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        self.put_opening_delimiter();
        put_part(content_type, payload, &mut self.buf);
        self.buf.put_slice(self.boundary.delimiter());
        self.write_buf()
    }

    /// Write the closing delimiter (`--<token>--`).
    pub fn finish(&mut self) -> Result<()> {
        self.buf.clear();
        self.put_opening_delimiter();
        self.buf.put_slice(b"--\r\n");
        self.write_buf()
    }

    /// Content type announcing this writer's boundary.
    pub fn content_type(&self) -> String {
        self.boundary.content_type()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    // Every part after the first reuses the delimiter that closed its
    // predecessor.
    fn put_opening_delimiter(&mut self) {
        if !self.started {
            self.buf.put_slice(self.boundary.delimiter());
            self.started = true;
        }
    }

    fn write_buf(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }
}
