use std::collections::HashSet;
use std::hash::Hash;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{metrics, DecodeError};

/// Values decoded from a single chunk, deduplicated by full equality.
pub type Batch<T> = HashSet<T>;

/// Turns one object span into a typed value.
///
/// Implemented by [`JsonDecoder`] for any `DeserializeOwned` type, and by any
/// `Fn(&[u8]) -> Result<T, DecodeError>` closure.
pub trait ObjectDecoder<T>: Send + Sync {
    fn decode(&self, span: &[u8]) -> Result<T, DecodeError>;
}

impl<T, F> ObjectDecoder<T> for F
where
    F: Fn(&[u8]) -> Result<T, DecodeError> + Send + Sync,
{
    fn decode(&self, span: &[u8]) -> Result<T, DecodeError> {
        self(span)
    }
}

/// `simd_json` decoding, with a JSON5 retry when the `relaxed` feature is on.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDecoder;

impl<T: DeserializeOwned> ObjectDecoder<T> for JsonDecoder {
    fn decode(&self, span: &[u8]) -> Result<T, DecodeError> {
        // simd_json parses in place
        let mut owned = span.to_vec();
        match simd_json::from_slice::<T>(&mut owned) {
            Ok(value) => Ok(value),
            Err(e) => {
                #[cfg(feature = "relaxed")]
                {
                    if let Ok(text) = std::str::from_utf8(span) {
                        if let Ok(value) = json5::from_str::<T>(text) {
                            return Ok(value);
                        }
                    }
                }
                Err(DecodeError::Json(e))
            }
        }
    }
}

/// Decodes every span into a fresh batch. Failures are logged and skipped.
pub fn decode_batch<T, D>(decoder: &D, spans: &[Bytes], preview_bytes: usize) -> Batch<T>
where
    T: Eq + Hash,
    D: ObjectDecoder<T> + ?Sized,
{
    let mut batch = HashSet::with_capacity(spans.len());
    let mut decoded = 0;
    for span in spans {
        match decoder.decode(span) {
            Ok(value) => {
                decoded += 1;
                batch.insert(value);
            }
            Err(e) => {
                warn!(
                    error = %e,
                    span_len = span.len(),
                    preview = %preview(span, preview_bytes),
                    "Skipping undecodable object"
                );
                metrics::record_decode_failure();
            }
        }
    }
    metrics::record_decoded(decoded);
    batch
}

fn preview(span: &[u8], limit: usize) -> String {
    String::from_utf8_lossy(&span[..span.len().min(limit)]).into_owned()
}
