use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use snapshooter_frame::{Boundary, Frame, MultipartDecoder};
use snapshooter_source::{ByteSource, Connector};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::config::StreamConfig;
use crate::error::StreamError;
use crate::state::{ConnectionState, StatsSnapshot, StreamStats};

type FrameCallback = Box<dyn FnMut(&Frame) + Send>;

// Frames a slow `next_frame` caller can fall behind by before it skips ahead.
const FRAME_CHANNEL_CAPACITY: usize = 16;

/// Keeps the latest frame of one MJPEG source, reconnecting forever.
///
/// The stream is driven by [`FrameStream::run`] (or [`FrameStream::spawn`]).
/// A single task owns the connection and the accumulation buffer; everything
/// else observes it through a [`FrameStreamHandle`].
pub struct FrameStream<C> {
    connector: C,
    config: StreamConfig,
    on_frame: Option<FrameCallback>,
    latest: watch::Sender<Option<Frame>>,
    frames: broadcast::Sender<Frame>,
    state: watch::Sender<ConnectionState>,
    stats: Arc<StreamStats>,
    cancel: CancellationToken,
}

impl<C: Connector> FrameStream<C> {
    /// Create a stream with default configuration.
    pub fn new(connector: C) -> Self {
        Self::with_config(connector, StreamConfig::default())
    }

    /// Create a stream with explicit configuration.
    pub fn with_config(connector: C, config: StreamConfig) -> Self {
        let (latest, _) = watch::channel(None);
        let (frames, _) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            connector,
            config,
            on_frame: None,
            latest,
            frames,
            state,
            stats: Arc::new(StreamStats::default()),
            cancel: CancellationToken::new(),
        }
    }

    /// Register a callback fired synchronously for every extracted frame.
    ///
    /// It runs on the streaming task before the next chunk is handled, so it
    /// should copy what it needs and return quickly.
    pub fn on_frame(mut self, callback: impl FnMut(&Frame) + Send + 'static) -> Self {
        self.on_frame = Some(Box::new(callback));
        self
    }

    /// A handle for observing and stopping this stream.
    pub fn handle(&self) -> FrameStreamHandle {
        FrameStreamHandle {
            latest: self.latest.subscribe(),
            frames: self.frames.subscribe(),
            state: self.state.subscribe(),
            stats: Arc::clone(&self.stats),
            cancel: self.cancel.clone(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Drive the stream until [`FrameStreamHandle::shutdown`] is called.
    ///
    /// Connectivity failures never end this future.
    pub async fn run(mut self) {
        let target = self.connector.target();
        let cancel = self.cancel.clone();
        tracing::info!(url = %target, "frame stream starting");

        loop {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = self.session() => outcome,
            };
            let reason = match outcome {
                Ok(never) => match never {},
                Err(reason) => reason,
            };

            self.state.send_replace(ConnectionState::Disconnected);
            StreamStats::add(&self.stats.disconnects, 1);
            tracing::warn!(
                url = %target,
                error = %reason,
                retry_in = ?self.config.retry_delay,
                "frame stream disconnected, retrying"
            );

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.retry_delay) => {}
            }
        }

        self.state.send_replace(ConnectionState::Disconnected);
        tracing::info!(url = %target, "frame stream stopped");
    }

    /// Spawn [`FrameStream::run`] on the current tokio runtime.
    pub fn spawn(self) -> (FrameStreamHandle, JoinHandle<()>)
    where
        C: 'static,
        C::Source: 'static,
    {
        let handle = self.handle();
        let task = tokio::spawn(self.run());
        (handle, task)
    }

    /// One connection attempt, from request to terminal event.
    ///
    /// Only returns when the session is over; the error says why. The
    /// source is dropped on return, which aborts the request.
    async fn session(&mut self) -> Result<Infallible, StreamError> {
        let idle = self.config.idle_timeout;

        self.state.send_replace(ConnectionState::Connecting);
        StreamStats::add(&self.stats.connect_attempts, 1);

        let mut source = timeout(idle, self.connector.connect())
            .await
            .map_err(|_| StreamError::ConnectTimeout(idle))??;
        let boundary = Boundary::from_content_type(source.content_type())?;
        let mut decoder = MultipartDecoder::with_config(boundary, self.config.decoder.clone());

        self.state.send_replace(ConnectionState::Streaming);
        StreamStats::add(&self.stats.sessions, 1);
        tracing::info!(boundary = ?decoder.boundary(), "frame stream connected");

        loop {
            let chunk = timeout(idle, source.next_chunk())
                .await
                .map_err(|_| StreamError::Idle(idle))??
                .ok_or(StreamError::Ended)?;
            tracing::trace!(len = chunk.len(), buffered = decoder.buffered(), "chunk received");

            decoder.push(&chunk);
            let malformed_before = decoder.malformed_segments();
            let extracted = loop {
                match decoder.next_frame() {
                    Ok(Some(frame)) => self.publish(frame),
                    Ok(None) => break Ok(()),
                    Err(err) => break Err(err),
                }
            };
            StreamStats::add(
                &self.stats.malformed_segments,
                decoder.malformed_segments() - malformed_before,
            );
            extracted?;
        }
    }

    fn publish(&mut self, frame: Frame) {
        StreamStats::add(&self.stats.frames, 1);
        tracing::debug!(len = frame.len(), "frame extracted");

        self.latest.send_replace(Some(frame.clone()));
        // No receivers is fine; nobody is waiting.
        let _ = self.frames.send(frame.clone());
        if let Some(callback) = self.on_frame.as_mut() {
            callback(&frame);
        }
    }
}

/// Cheap, cloneable view of a running [`FrameStream`].
#[derive(Debug)]
pub struct FrameStreamHandle {
    latest: watch::Receiver<Option<Frame>>,
    frames: broadcast::Receiver<Frame>,
    state: watch::Receiver<ConnectionState>,
    stats: Arc<StreamStats>,
    cancel: CancellationToken,
}

impl Clone for FrameStreamHandle {
    fn clone(&self) -> Self {
        Self {
            latest: self.latest.clone(),
            frames: self.frames.resubscribe(),
            state: self.state.clone(),
            stats: Arc::clone(&self.stats),
            cancel: self.cancel.clone(),
        }
    }
}

impl FrameStreamHandle {
    /// The most recent frame, if any has been extracted yet.
    pub fn latest(&self) -> Option<Frame> {
        self.latest.borrow().clone()
    }

    /// Wait for the first frame published after this call.
    ///
    /// The subscription starts when `next_frame` is called, not when the
    /// future is first polled, so calling it before the stream runs catches
    /// its very first frame. Frames published in the same chunk are not
    /// skipped. Returns `None` once the stream has been shut down or dropped.
    pub fn next_frame(&self) -> impl Future<Output = Option<Frame>> + Send + 'static {
        let mut frames = self.frames.resubscribe();
        let cancel = self.cancel.clone();
        async move {
            loop {
                tokio::select! {
                    received = frames.recv() => match received {
                        Ok(frame) => return Some(frame),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "next_frame fell behind, skipping ahead");
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    },
                    _ = cancel.cancelled() => return None,
                }
            }
        }
    }

    /// A receiver of the most recent frame. Intermediate frames may be
    /// coalesced; use [`FrameStreamHandle::next_frame`] or a callback to see
    /// each one.
    pub fn subscribe(&self) -> watch::Receiver<Option<Frame>> {
        self.latest.clone()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// A receiver that observes connection state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Snapshot of the stream counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the stream. The run loop exits at its next suspension point.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Whether [`FrameStreamHandle::shutdown`] has been called.
    pub fn is_shutdown(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
