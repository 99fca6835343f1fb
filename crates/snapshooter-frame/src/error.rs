/// Errors that can occur while segmenting a multipart stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The response carried no content type at all.
    #[error("response has no content type")]
    MissingContentType,

    /// The content type has no usable `boundary` parameter.
    #[error("content type {content_type:?} has no boundary parameter")]
    MissingBoundary { content_type: String },

    /// No boundary was found before the buffer reached its limit.
    #[error("accumulation buffer overflow ({size} bytes, max {max})")]
    BufferOverflow { size: usize, max: usize },

    /// An I/O error occurred while reading or writing parts.
    #[error("multipart I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before another complete frame was received.
    #[error("stream closed (no further complete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
