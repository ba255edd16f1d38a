use bytes::Bytes;

use crate::scanner::rfind_open_brace;

/// The previous chunk of a stream, kept whole so that an object opened near
/// its end can be completed by the next chunk.
///
/// Holding a [`Bytes`] handle means retaining the chunk is a reference count
/// bump, not a copy.
#[derive(Debug, Default, Clone)]
pub struct CarryBuffer {
    chunk: Bytes,
    resume: usize,
}

impl CarryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.chunk
    }

    pub fn len(&self) -> usize {
        self.chunk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }

    /// Replaces the retained chunk, whether or not anything closed in it.
    ///
    /// `resume` is where scanning of `chunk` stopped after its last object.
    pub fn replace(&mut self, chunk: Bytes, resume: usize) {
        self.resume = resume.min(chunk.len());
        self.chunk = chunk;
    }

    pub fn clear(&mut self) {
        self.chunk = Bytes::new();
        self.resume = 0;
    }

    pub fn resume_offset(&self) -> usize {
        self.resume
    }

    /// The part of the chunk after its last extracted object.
    pub fn unscanned(&self) -> &[u8] {
        self.chunk.get(self.resume..).unwrap_or_default()
    }

    pub fn last_open_brace(&self) -> Option<usize> {
        rfind_open_brace(&self.chunk)
    }

    /// Bytes from `offset` to the end, or `None` if `offset` is out of range.
    pub fn tail(&self, offset: usize) -> Option<&[u8]> {
        self.chunk.get(offset..)
    }
}
