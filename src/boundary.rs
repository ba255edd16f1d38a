use std::fmt::Debug;

use tracing::trace;

use crate::scanner::{scan_braces, Brace};
use crate::CarryBuffer;

/// Which buffers an [`ObjectSpan`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanOrigin {
    /// Both braces are in the current chunk.
    Current,
    /// The opening brace is in the carry buffer, the closing one in the current chunk.
    CrossChunk,
}

/// Inclusive byte bounds of a candidate object.
///
/// For [`SpanOrigin::CrossChunk`] spans `lower` indexes the carry buffer and
/// `upper` indexes the current chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSpan {
    pub lower: usize,
    pub upper: usize,
    pub origin: SpanOrigin,
}

impl ObjectSpan {
    pub fn current(lower: usize, upper: usize) -> Self {
        Self {
            lower,
            upper,
            origin: SpanOrigin::Current,
        }
    }

    pub fn cross_chunk(lower: usize, upper: usize) -> Self {
        Self {
            lower,
            upper,
            origin: SpanOrigin::CrossChunk,
        }
    }
}

/// Finds object boundaries in a chunk, given the previous chunk as carry.
///
/// `from` is where scanning resumes inside `chunk`; it is `0` for the first
/// call on a chunk and one past the previous span's `upper` afterwards.
pub trait BoundaryStrategy: Debug + Send + Sync {
    fn next_span(&self, chunk: &[u8], carry: &CarryBuffer, from: usize) -> Option<ObjectSpan>;
}

/// Tracks a single `{`/`}` pair at a time.
///
/// A `{` seen while another is pending replaces it, so nested objects yield
/// their innermost pair and the outer braces are lost. A `}` that is the first
/// brace of a chunk closes the last `{` of the carry buffer; any other `}`
/// without a pending `{` is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct BraceBoundary;

impl BoundaryStrategy for BraceBoundary {
    fn next_span(&self, chunk: &[u8], carry: &CarryBuffer, from: usize) -> Option<ObjectSpan> {
        let window = chunk.get(from..)?;
        let mut lower: Option<usize> = None;
        let mut seen_brace = from > 0;

        for position in scan_braces(window) {
            let offset = from + position.offset;
            match (position.brace, lower) {
                (Brace::Open, _) => lower = Some(offset),
                (Brace::Close, Some(open)) if open < offset => {
                    return Some(ObjectSpan::current(open, offset));
                }
                (Brace::Close, Some(_)) => lower = None,
                (Brace::Close, None) if !seen_brace => match carry.last_open_brace() {
                    Some(open) => return Some(ObjectSpan::cross_chunk(open, offset)),
                    None => trace!(offset, "closing brace with nothing open in carry"),
                },
                (Brace::Close, None) => trace!(offset, "stray closing brace"),
            }
            seen_brace = true;
        }
        None
    }
}

/// Depth-tracking strategy that understands JSON strings and escapes.
///
/// Nested objects come out whole and braces inside strings are ignored. An
/// object still open at the end of the carry buffer is resumed in the next
/// chunk, scanning the carry from where its last object ended. Objects
/// spanning more than two chunks are still lost.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictBoundary;

#[derive(Debug, Default, Clone, Copy)]
struct DepthState {
    depth: u32,
    in_string: bool,
    escape: bool,
}

enum Step {
    Opened,
    Closed,
    Other,
}

impl DepthState {
    fn step(&mut self, byte: u8) -> Step {
        match (self.in_string, self.escape, byte) {
            (true, false, b'\\') => self.escape = true,
            (true, true, _) => self.escape = false,
            (true, false, b'"') => self.in_string = false,
            (false, _, b'"') => self.in_string = true,
            (false, _, b'{') => {
                self.depth += 1;
                if self.depth == 1 {
                    return Step::Opened;
                }
            }
            // a `}` at depth zero belongs to an object we never saw open
            (false, _, b'}') if self.depth > 0 => {
                self.depth -= 1;
                if self.depth == 0 {
                    return Step::Closed;
                }
            }
            _ => {}
        }
        Step::Other
    }
}

impl StrictBoundary {
    /// Start offset and scanner state of an object left open at the end of `carry`.
    fn open_at_end(carry: &[u8]) -> Option<(usize, DepthState)> {
        let mut state = DepthState::default();
        let mut start = None;
        for (offset, &byte) in carry.iter().enumerate() {
            match state.step(byte) {
                Step::Opened => start = Some(offset),
                Step::Closed => start = None,
                Step::Other => {}
            }
        }
        if state.depth > 0 {
            start.map(|start| (start, state))
        } else {
            None
        }
    }
}

impl BoundaryStrategy for StrictBoundary {
    fn next_span(&self, chunk: &[u8], carry: &CarryBuffer, from: usize) -> Option<ObjectSpan> {
        let window = chunk.get(from..)?;
        let mut state = DepthState::default();
        let mut lower = None;
        let mut origin = SpanOrigin::Current;

        if from == 0 {
            if let Some((start, resumed)) = Self::open_at_end(carry.unscanned()) {
                state = resumed;
                lower = Some(carry.resume_offset() + start);
                origin = SpanOrigin::CrossChunk;
            }
        }

        for (index, &byte) in window.iter().enumerate() {
            let offset = from + index;
            match state.step(byte) {
                Step::Opened => {
                    lower = Some(offset);
                    origin = SpanOrigin::Current;
                }
                Step::Closed => {
                    if let Some(lower) = lower {
                        return Some(ObjectSpan {
                            lower,
                            upper: offset,
                            origin,
                        });
                    }
                }
                Step::Other => {}
            }
        }
        None
    }
}
