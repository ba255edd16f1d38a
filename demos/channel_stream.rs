use prk_object_stream::{ChannelTransport, Completion, Streamer};
use serde::Deserialize;
use tokio::sync::oneshot;
use tokio::time::{sleep, Duration};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, PartialEq, Eq, Hash)]
struct Stamp {
    stamp: u64,
    tx_hash: String,
    stamp_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let transport = ChannelTransport::new();
    let sender = transport.register("stamps", 4);
    let streamer: Streamer<Stamp> = Streamer::new(transport);

    let (done_tx, done_rx) = oneshot::channel();
    let mut total = 0;
    streamer.stream(
        "stamps",
        move |stamps| {
            total += stamps.len();
            println!("batch of {} (total {})", stamps.len(), total);
        },
        move |completion: Completion| {
            let _ = done_tx.send(completion);
        },
    );

    // the body is cut at arbitrary points, as a network would
    let body = (0..25)
        .map(|i| {
            format!(
                r#"{{"stamp":{},"tx_hash":"{:064x}","stamp_url":"https://example.com/{}.png"}}"#,
                i, i, i
            )
        })
        .collect::<String>();
    for part in body.as_bytes().chunks(300) {
        sender.send(part.to_vec()).await?;
        sleep(Duration::from_millis(20)).await;
    }
    drop(sender);

    match done_rx.await? {
        Completion::Finished => println!("complete!"),
        Completion::Failed(e) => println!("failed: {}", e),
    }
    Ok(())
}
