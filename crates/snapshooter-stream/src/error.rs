use std::time::Duration;

/// Why a streaming session ended.
///
/// Every variant is recoverable: the stream logs it and reconnects.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Opening or reading the source failed.
    #[error("source error: {0}")]
    Source(#[from] snapshooter_source::SourceError),

    /// The response could not be segmented.
    #[error("frame error: {0}")]
    Frame(#[from] snapshooter_frame::FrameError),

    /// The server closed the response body.
    #[error("stream ended by server")]
    Ended,

    /// No body bytes arrived within the inactivity timeout.
    #[error("no data received for {0:?}")]
    Idle(Duration),

    /// No response headers arrived within the inactivity timeout.
    #[error("no response within {0:?}")]
    ConnectTimeout(Duration),
}
