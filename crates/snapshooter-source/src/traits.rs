use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

/// A live response body delivering chunks of arbitrary size.
///
/// Dropping the source aborts the underlying request.
pub trait ByteSource: Send {
    /// Content type announced by the source, if any.
    fn content_type(&self) -> Option<&str>;

    /// Wait for the next chunk. `Ok(None)` means the stream ended.
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<Bytes>>> + Send;
}

/// Opens a brand-new [`ByteSource`] per connection attempt.
pub trait Connector: Send {
    /// The source type produced on success.
    type Source: ByteSource;

    /// Open a new connection. Resolves once response headers are in.
    fn connect(&mut self) -> impl Future<Output = Result<Self::Source>> + Send;

    /// Human-readable target for logs. Must not leak credentials.
    fn target(&self) -> String;
}
