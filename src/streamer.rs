use std::hash::Hash;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::session::StreamSession;
use crate::{
    Batch, BoundaryStrategy, BraceBoundary, Completion, JsonDecoder, ObjectDecoder,
    ObjectExtractor, SessionRegistry, StreamConfig, StrictBoundary, Transport, TransportError,
};

/// Result of asking for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// A new session was started with the given callbacks.
    Started,
    /// A session for this source is already live; the new callbacks were dropped.
    AlreadyActive,
}

/// Batches as a stream. It ends after the last batch, with an `Err` item first
/// if the transport failed.
pub type BatchStream<T> = UnboundedReceiverStream<Result<Batch<T>, TransportError>>;

/// Entry point: subscribes to sources and delivers their objects batch by batch.
///
/// Sessions run as Tokio tasks, so `stream` and `batches` must be called from
/// within a runtime.
pub struct Streamer<T> {
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn ObjectDecoder<T>>,
    strategy: Arc<dyn BoundaryStrategy>,
    registry: SessionRegistry,
    config: StreamConfig,
}

impl<T> Streamer<T>
where
    T: DeserializeOwned + Eq + Hash + Send + 'static,
{
    /// Decodes objects as JSON into `T`.
    pub fn new(transport: impl Transport) -> Self {
        Self::with_decoder(transport, JsonDecoder)
    }
}

impl<T> Streamer<T>
where
    T: Eq + Hash + Send + 'static,
{
    pub fn with_decoder(transport: impl Transport, decoder: impl ObjectDecoder<T> + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            decoder: Arc::new(decoder),
            strategy: Arc::new(BraceBoundary),
            registry: SessionRegistry::new(),
            config: StreamConfig::default(),
        }
    }

    pub fn with_config(mut self, config: StreamConfig) -> Self {
        self.strategy = if config.strict_boundaries {
            Arc::new(StrictBoundary)
        } else {
            Arc::new(BraceBoundary)
        };
        self.config = config;
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn BoundaryStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shares `registry` with other streamers, so a source is claimed once across all of them.
    pub fn with_registry(mut self, registry: SessionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Subscribes to `source`.
    ///
    /// `on_batch` runs once per chunk that produced at least one value, before
    /// the next chunk is read. `on_complete` runs at most once, after the last
    /// batch, unless the session is cancelled first. If `source` already has a
    /// live session nothing happens and [`Subscription::AlreadyActive`] is returned.
    pub fn stream<B, C>(&self, source: impl Into<String>, on_batch: B, on_complete: C) -> Subscription
    where
        B: FnMut(Batch<T>) + Send + 'static,
        C: FnOnce(Completion) + Send + 'static,
    {
        let source = source.into();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let Some(id) = self.registry.try_register(&source, cancel_tx) else {
            debug!(%source, "Already streaming, ignoring subscription");
            return Subscription::AlreadyActive;
        };

        let session = StreamSession {
            id,
            source,
            extractor: ObjectExtractor::with_strategy(self.strategy.clone()),
            decoder: self.decoder.clone(),
            on_batch: Box::new(on_batch),
            on_complete: Box::new(on_complete),
            chunk_timeout: self.config.chunk_timeout,
            preview_bytes: self.config.decode_preview_bytes,
        };
        tokio::spawn(session.run(self.transport.clone(), self.registry.clone(), cancel_rx));
        Subscription::Started
    }

    /// Subscribes to `source` and returns its batches as a stream, or `None`
    /// if `source` already has a live session.
    pub fn batches(&self, source: impl Into<String>) -> Option<BatchStream<T>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let done = tx.clone();
        let subscription = self.stream(
            source,
            move |batch| {
                // a dropped receiver just means nobody is listening any more
                let _ = tx.send(Ok(batch));
            },
            move |completion| {
                if let Completion::Failed(e) = completion {
                    let _ = done.send(Err(e));
                }
            },
        );
        match subscription {
            Subscription::Started => Some(UnboundedReceiverStream::new(rx)),
            Subscription::AlreadyActive => None,
        }
    }

    /// Stops the session for `source`. No further batches are produced and
    /// `on_complete` is not called.
    pub fn cancel(&self, source: &str) -> bool {
        self.registry.cancel(source)
    }

    /// Cancels every live session in this streamer's registry.
    pub fn stop_all(&self) -> usize {
        self.registry.cancel_all()
    }

    pub fn is_active(&self, source: &str) -> bool {
        self.registry.is_active(source)
    }
}
