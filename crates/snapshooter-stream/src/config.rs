use std::time::Duration;

use snapshooter_frame::DecoderConfig;

/// Fixed delay between a disconnect and the next attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Silence after which the in-flight request is aborted.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3);

/// Frame stream behavior.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Delay before reconnecting. Default: 5 s.
    pub retry_delay: Duration,
    /// Inactivity timeout, applied while waiting for response headers and
    /// for every body chunk. Default: 3 s.
    pub idle_timeout: Duration,
    /// Accumulation buffer limits.
    pub decoder: DecoderConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            decoder: DecoderConfig::default(),
        }
    }
}
