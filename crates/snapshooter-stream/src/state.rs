use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Connection lifecycle of a frame stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Waiting to (re)connect, or stopped.
    #[default]
    Disconnected,
    /// Request sent, waiting for response headers.
    Connecting,
    /// Receiving body chunks.
    Streaming,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Streaming => "streaming",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters shared between a running stream and its handles.
#[derive(Debug, Default)]
pub(crate) struct StreamStats {
    pub(crate) connect_attempts: AtomicU64,
    pub(crate) sessions: AtomicU64,
    pub(crate) frames: AtomicU64,
    pub(crate) malformed_segments: AtomicU64,
    pub(crate) disconnects: AtomicU64,
}

impl StreamStats {
    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connect_attempts: self.connect_attempts.load(Ordering::Relaxed),
            sessions: self.sessions.load(Ordering::Relaxed),
            frames: self.frames.load(Ordering::Relaxed),
            malformed_segments: self.malformed_segments.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of a stream's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Connection attempts started.
    pub connect_attempts: u64,
    /// Attempts that reached the streaming state.
    pub sessions: u64,
    /// Frames published.
    pub frames: u64,
    /// Segments dropped for lacking a header/body separator.
    pub malformed_segments: u64,
    /// Sessions or attempts that ended and were retried.
    pub disconnects: u64,
}
