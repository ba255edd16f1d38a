use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::TransportError;

/// Ordered body chunks of one source; the stream ending is the completion signal.
pub type ChunkStream = BoxStream<'static, Result<Bytes, TransportError>>;

/// Anything that can deliver a source as ordered chunks.
///
/// Dropping the returned stream cancels the underlying request.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn open(&self, source: &str) -> Result<ChunkStream, TransportError>;
}

type ChunkResult = Result<Bytes, TransportError>;

/// In-memory transport: each source is a channel registered up front.
///
/// A source can be opened once per registration.
#[derive(Debug, Clone, Default)]
pub struct ChannelTransport {
    pending: Arc<DashMap<String, mpsc::Receiver<ChunkResult>>>,
    opened: Arc<AtomicUsize>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `source` available, replacing any registration not yet opened.
    pub fn register(&self, source: impl Into<String>, capacity: usize) -> ChunkSender {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        self.pending.insert(source.into(), rx);
        ChunkSender { tx }
    }

    /// How many times any source has been opened.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn open(&self, source: &str) -> Result<ChunkStream, TransportError> {
        let (_, rx) = self
            .pending
            .remove(source)
            .ok_or_else(|| TransportError::Unavailable(source.to_string()))?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(ReceiverStream::new(rx).boxed())
    }
}

/// Producer half of a [`ChannelTransport`] source. Dropping it ends the stream.
#[derive(Debug, Clone)]
pub struct ChunkSender {
    tx: mpsc::Sender<ChunkResult>,
}

impl ChunkSender {
    pub async fn send(&self, chunk: impl Into<Bytes>) -> Result<(), TransportError> {
        self.tx
            .send(Ok(chunk.into()))
            .await
            .map_err(|_| TransportError::Unavailable("stream receiver dropped".into()))
    }

    /// Ends the stream with `error`.
    pub async fn fail(self, error: TransportError) -> Result<(), TransportError> {
        self.tx
            .send(Err(error))
            .await
            .map_err(|_| TransportError::Unavailable("stream receiver dropped".into()))
    }
}
