use prk_object_stream::{HttpConfig, HttpTransport, StreamConfig, Streamer};
use serde::Deserialize;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, PartialEq, Eq, Hash)]
struct Stamp {
    stamp: i64,
    tx_hash: String,
    stamp_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://stampchain.io/stamp.json".to_string());

    let transport = HttpTransport::new(HttpConfig::default())?;
    let streamer: Streamer<Stamp> = Streamer::new(transport).with_config(StreamConfig {
        chunk_timeout: Some(Duration::from_secs(30)),
        ..Default::default()
    });

    let mut batches = streamer
        .batches(url.clone())
        .ok_or("already streaming this source")?;

    let mut count = 0;
    while let Some(batch) = batches.next().await {
        match batch {
            Ok(stamps) => {
                count += stamps.len();
                println!("count: {}", count);
            }
            Err(e) => eprintln!("stream failed: {}", e),
        }
    }
    println!("complete!");
    Ok(())
}
