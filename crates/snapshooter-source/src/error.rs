/// Errors that can occur while opening or reading a byte source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source location could not be parsed or is unsupported.
    #[error("invalid source url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP request failed (refused, reset, TLS, body read).
    #[cfg(feature = "http")]
    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP status {status}")]
    Status { status: u16, url: String },

    /// An I/O error occurred on the source.
    #[error("source I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;
