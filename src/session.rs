use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::registry::SessionId;
use crate::{
    decode_batch, metrics, Batch, ChunkStream, ObjectDecoder, ObjectExtractor, SessionRegistry,
    Transport, TransportError,
};

/// How a session ended.
#[derive(Debug)]
pub enum Completion {
    /// The source delivered its last chunk.
    Finished,
    /// The transport gave up; batches delivered so far are still valid.
    Failed(TransportError),
}

impl Completion {
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Finished)
    }

    pub fn error(&self) -> Option<&TransportError> {
        match self {
            Completion::Finished => None,
            Completion::Failed(e) => Some(e),
        }
    }
}

pub type BatchCallback<T> = Box<dyn FnMut(Batch<T>) + Send + 'static>;
pub type CompletionCallback = Box<dyn FnOnce(Completion) + Send + 'static>;

/// One subscription: pulls chunks from the transport in order, extracts and
/// decodes objects, and hands non-empty batches to the consumer.
pub(crate) struct StreamSession<T> {
    pub(crate) id: SessionId,
    pub(crate) source: String,
    pub(crate) extractor: ObjectExtractor,
    pub(crate) decoder: Arc<dyn ObjectDecoder<T>>,
    pub(crate) on_batch: BatchCallback<T>,
    pub(crate) on_complete: CompletionCallback,
    pub(crate) chunk_timeout: Option<Duration>,
    pub(crate) preview_bytes: usize,
}

impl<T: Eq + Hash + Send + 'static> StreamSession<T> {
    #[instrument(name = "stream_session", skip_all, fields(source = %self.source, session = self.id))]
    pub(crate) async fn run(
        mut self,
        transport: Arc<dyn Transport>,
        registry: SessionRegistry,
        mut cancel: oneshot::Receiver<()>,
    ) {
        let outcome = self.drive(transport.as_ref(), &mut cancel).await;
        self.extractor.reset();

        match outcome {
            Some(completion) => {
                registry.release(&self.source, self.id);
                match completion.error() {
                    None => info!("Stream finished"),
                    Some(e) => warn!(error = %e, "Stream failed"),
                }
                (self.on_complete)(completion);
            }
            None => debug!("Stream cancelled"),
        }
    }

    /// Returns `None` once cancelled. The signal is checked before every
    /// chunk, so chunks already buffered by the transport are never processed
    /// after a cancel.
    async fn drive(
        &mut self,
        transport: &dyn Transport,
        cancel: &mut oneshot::Receiver<()>,
    ) -> Option<Completion> {
        let mut chunks = tokio::select! {
            biased;
            _ = &mut *cancel => return None,
            opened = transport.open(&self.source) => match opened {
                Ok(chunks) => chunks,
                Err(e) => return Some(Completion::Failed(e)),
            },
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = &mut *cancel => return None,
                next = next_chunk(&mut chunks, self.chunk_timeout) => next,
            };

            match next {
                Ok(Some(chunk)) => self.process_chunk(chunk),
                Ok(None) => return Some(Completion::Finished),
                Err(e) => return Some(Completion::Failed(e)),
            }
        }
    }

    fn process_chunk(&mut self, chunk: Bytes) {
        metrics::record_chunk(chunk.len());
        let chunk_len = chunk.len();
        let spans = self.extractor.push(chunk);
        let batch = decode_batch(self.decoder.as_ref(), &spans, self.preview_bytes);
        debug!(
            chunk_len,
            spans = spans.len(),
            batch = batch.len(),
            "Processed chunk"
        );
        if !batch.is_empty() {
            (self.on_batch)(batch);
        }
    }
}

async fn next_chunk(
    chunks: &mut ChunkStream,
    limit: Option<Duration>,
) -> Result<Option<Bytes>, TransportError> {
    let next = match limit {
        Some(limit) => timeout(limit, chunks.next())
            .await
            .map_err(|_| TransportError::Timeout)?,
        None => chunks.next().await,
    };
    next.transpose()
}
