use snapshooter_source::{HttpConfig, HttpConnector, Result};

use crate::config::StreamConfig;
use crate::stream::FrameStream;

/// Build a frame stream for an HTTP MJPEG endpoint with default configuration.
///
/// Nothing connects until the stream is run.
pub fn stream_url(url: &str) -> Result<FrameStream<HttpConnector>> {
    stream_url_with_config(url, HttpConfig::default(), StreamConfig::default())
}

/// Build a frame stream for an HTTP MJPEG endpoint with explicit configuration.
pub fn stream_url_with_config(
    url: &str,
    http_config: HttpConfig,
    config: StreamConfig,
) -> Result<FrameStream<HttpConnector>> {
    let connector = HttpConnector::with_config(url, http_config)?;
    Ok(FrameStream::with_config(connector, config))
}
