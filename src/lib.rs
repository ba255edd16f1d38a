//! # Streaming Object Extraction
//!
//! This library consumes a response body that is a plain concatenation of JSON
//! objects (`{...}{...}{...}` with no enclosing array and no delimiters) and
//! delivers each object as soon as its closing brace arrives, without waiting
//! for the rest of the body and without rescanning bytes already seen.
//!
//! Each chunk is scanned once. An object whose opening brace fell in the
//! previous chunk is reassembled from that chunk, which is kept as a carry
//! buffer. Decoded values are gathered into a per-chunk [`Batch`] (a set, so
//! identical objects within one chunk collapse) and handed to the consumer.
//!
//! The default [`BraceBoundary`] only tracks one `{`/`}` pair at a time: it
//! does not understand nesting or braces inside strings. That is enough for
//! a flat stream of sibling objects; [`StrictBoundary`] is available when it
//! is not.
//!
//! ## Example
//!
//! ```no_run
//! use prk_object_stream::{ChannelTransport, Completion, Streamer};
//!
//! #[derive(Debug, PartialEq, Eq, Hash, serde::Deserialize)]
//! struct Stamp {
//!     stamp: u64,
//!     tx_hash: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ChannelTransport::new();
//!     let sender = transport.register("stamps", 8);
//!     let streamer: Streamer<Stamp> = Streamer::new(transport);
//!
//!     let (done_tx, done_rx) = tokio::sync::oneshot::channel();
//!     streamer.stream(
//!         "stamps",
//!         |stamps| println!("received {} stamps", stamps.len()),
//!         move |completion: Completion| {
//!             let _ = done_tx.send(completion.is_success());
//!         },
//!     );
//!
//!     sender.send(r#"{"stamp":1,"tx_hash":"a"}{"stamp":2,"#).await?;
//!     sender.send(r#""tx_hash":"b"}"#).await?;
//!     drop(sender);
//!
//!     println!("clean finish: {}", done_rx.await?);
//!     Ok(())
//! }
//! ```

#[cfg(test)]
mod tests;

mod error;
pub use error::*;

mod scanner;
pub use scanner::*;

mod carry;
pub use carry::*;

mod boundary;
pub use boundary::*;

mod extractor;
pub use extractor::*;

mod decoder;
pub use decoder::*;

mod transport;
pub use transport::*;

#[cfg(feature = "http")]
mod connectors;
#[cfg(feature = "http")]
pub use connectors::*;

mod registry;
pub use registry::*;

mod session;
pub use session::{BatchCallback, Completion, CompletionCallback};

mod streamer;
pub use streamer::*;

mod config;
pub use self::config::*;

pub mod metrics;
