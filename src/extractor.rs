use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use tracing::{debug, instrument, warn};

use crate::{BoundaryStrategy, BraceBoundary, CarryBuffer, ObjectSpan, SpanOrigin};

/// Per-stream state turning a sequence of chunks into object byte spans.
///
/// Every chunk is scanned once, left to right. Spans are returned in the order
/// their closing braces appear, then the chunk becomes the new carry buffer.
///
/// ```
/// use bytes::Bytes;
/// use prk_object_stream::ObjectExtractor;
///
/// let mut extractor = ObjectExtractor::new();
/// assert!(extractor.push(Bytes::from_static(br#"{"a":1,"b":"#)).is_empty());
/// let spans = extractor.push(Bytes::from_static(br#"2}{"a":3}"#));
/// assert_eq!(spans, vec![Bytes::from_static(br#"{"a":1,"b":2}"#), Bytes::from_static(br#"{"a":3}"#)]);
/// ```
#[derive(Debug, Clone)]
pub struct ObjectExtractor {
    carry: CarryBuffer,
    strategy: Arc<dyn BoundaryStrategy>,
}

impl Default for ObjectExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectExtractor {
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(BraceBoundary))
    }

    pub fn with_strategy(strategy: Arc<dyn BoundaryStrategy>) -> Self {
        Self {
            carry: CarryBuffer::new(),
            strategy,
        }
    }

    pub fn carry(&self) -> &CarryBuffer {
        &self.carry
    }

    #[instrument(level = "trace", skip_all, fields(chunk_len = chunk.len(), carry_len = self.carry.len()))]
    pub fn push(&mut self, chunk: Bytes) -> Vec<Bytes> {
        let mut spans = Vec::new();
        let mut from = 0;

        while let Some(span) = self.strategy.next_span(&chunk, &self.carry, from) {
            if span.upper < from {
                warn!(?span, from, "boundary strategy went backwards, abandoning chunk");
                break;
            }
            match self.materialize(&chunk, span) {
                Some(bytes) => spans.push(bytes),
                None => debug!(?span, "skipping span outside buffer bounds"),
            }
            from = span.upper + 1;
        }

        self.carry.replace(chunk, from);
        spans
    }

    /// Drops the carry buffer so nothing leaks into a later stream.
    pub fn reset(&mut self) {
        self.carry.clear();
    }

    fn materialize(&self, chunk: &Bytes, span: ObjectSpan) -> Option<Bytes> {
        match span.origin {
            SpanOrigin::Current => {
                if span.lower >= span.upper || span.upper >= chunk.len() {
                    return None;
                }
                Some(chunk.slice(span.lower..=span.upper))
            }
            SpanOrigin::CrossChunk => {
                let head = self.carry.tail(span.lower)?;
                let tail = chunk.get(..=span.upper)?;
                let mut joined = BytesMut::with_capacity(head.len() + tail.len());
                joined.extend_from_slice(head);
                joined.extend_from_slice(tail);
                Some(joined.freeze())
            }
        }
    }
}
