#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use bytes::Bytes;
    use serde::Deserialize;
    use tokio::sync::{mpsc, oneshot};

    use crate::*;

    #[derive(Debug, Deserialize, PartialEq, Eq, Hash, Clone)]
    struct ChatMessage {
        user: String,
        text: String,
        timestamp: u64,
    }

    fn message(user: &str, text: &str, timestamp: u64) -> ChatMessage {
        ChatMessage {
            user: user.to_string(),
            text: text.to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_invalid_spans_are_skipped() {
        let chat_data = r#"{"user": "Alice", "text": "Hello!", "timestamp": 1620000000}
        {"user": "Bob", "text": 42, "timestamp": 1620000001}
        {"user": "Charlie", "timestamp": }
        {"user": "Charlie", "text": "How's everyone?", "timestamp": 1620000002}"#;

        let mut extractor = ObjectExtractor::new();
        let found = extractor.push(Bytes::from_static(chat_data.as_bytes()));
        assert_eq!(found.len(), 4);

        let batch = decode_batch::<ChatMessage, _>(&JsonDecoder, &found, 32);
        let expected: HashSet<ChatMessage> = [
            message("Alice", "Hello!", 1620000000),
            message("Charlie", "How's everyone?", 1620000002),
        ]
        .into_iter()
        .collect();
        assert_eq!(batch, expected);
    }

    #[test]
    fn test_non_utf8_span_is_skipped() {
        let spans = vec![
            Bytes::from_static(b"{\"user\": \"\xff\xfe\"}"),
            Bytes::from_static(br#"{"user": "Dan", "text": "hi", "timestamp": 1}"#),
        ];
        let batch = decode_batch::<ChatMessage, _>(&JsonDecoder, &spans, 8);
        assert_eq!(batch.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_objects_do_not_end_the_stream() {
        let transport = ChannelTransport::new();
        let sender = transport.register("chat", 4);
        let streamer: Streamer<ChatMessage> = Streamer::new(transport);

        let (batch_tx, mut batch_rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel();
        streamer.stream(
            "chat",
            move |batch| {
                let _ = batch_tx.send(batch);
            },
            move |completion| {
                let _ = done_tx.send(completion);
            },
        );

        sender
            .send(r#"{"user":"Alice","text":"Hi","timestamp":1}{"user":"Bob","text":"#)
            .await
            .unwrap();
        sender.send(r#"oops}garbage}{"#).await.unwrap();
        sender
            .send(r#""user":"Eve","text":"Bye","timestamp":3}"#)
            .await
            .unwrap();
        drop(sender);

        assert!(done_rx.await.unwrap().is_success());

        let mut batches = Vec::new();
        while let Some(batch) = batch_rx.recv().await {
            batches.push(batch);
        }
        assert_eq!(batches.len(), 2);
        assert!(batches[0].contains(&message("Alice", "Hi", 1)));
        assert!(batches[1].contains(&message("Eve", "Bye", 3)));
    }
}
