use simd_json::Error as SimdJsonError;

/// A span that could not be turned into a value. Always recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("JSON decoding error: {0}")]
    Json(#[from] SimdJsonError),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Why a stream ended before its source said it was done.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Timeout while waiting for the next chunk")]
    Timeout,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Source not available: {0}")]
    Unavailable(String),
}
