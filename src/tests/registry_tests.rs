#[cfg(test)]
mod tests {
    use tokio::sync::oneshot;

    use crate::SessionRegistry;

    #[test]
    fn test_one_session_per_source() {
        let registry = SessionRegistry::new();
        let (first, _first_rx) = oneshot::channel();
        let (second, _second_rx) = oneshot::channel();

        assert!(registry.try_register("https://a.example/stamps", first).is_some());
        assert!(registry.try_register("https://a.example/stamps", second).is_none());
        assert_eq!(registry.len(), 1);
        assert!(registry.is_active("https://a.example/stamps"));
    }

    #[test]
    fn test_release_ignores_stale_session() {
        let registry = SessionRegistry::new();
        let (old_tx, _old_rx) = oneshot::channel();
        let old = registry.try_register("src", old_tx).unwrap();
        assert!(registry.cancel("src"));

        let (new_tx, _new_rx) = oneshot::channel();
        let new = registry.try_register("src", new_tx).unwrap();
        assert_ne!(old, new);

        // the cancelled session finishing late must not evict its successor
        assert!(!registry.release("src", old));
        assert!(registry.is_active("src"));
        assert!(registry.release("src", new));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_signals_session() {
        let registry = SessionRegistry::new();
        let (tx, rx) = oneshot::channel();
        registry.try_register("src", tx).unwrap();

        assert!(registry.cancel("src"));
        assert!(rx.await.is_ok());
        assert!(!registry.cancel("src"));
        assert!(!registry.is_active("src"));
    }

    #[test]
    fn test_cancel_all() {
        let registry = SessionRegistry::new();
        let mut receivers = Vec::new();
        for source in ["a", "b", "c"] {
            let (tx, rx) = oneshot::channel();
            registry.try_register(source, tx).unwrap();
            receivers.push(rx);
        }
        let mut sources = registry.sources();
        sources.sort();
        assert_eq!(sources, vec!["a", "b", "c"]);

        assert_eq!(registry.cancel_all(), 3);
        assert!(registry.is_empty());
        for mut rx in receivers {
            assert!(rx.try_recv().is_ok());
        }
    }

    #[test]
    fn test_registries_are_independent() {
        let left = SessionRegistry::new();
        let right = SessionRegistry::new();
        let shared = left.clone();
        let (a, _a_rx) = oneshot::channel();
        let (b, _b_rx) = oneshot::channel();

        left.try_register("src", a).unwrap();
        assert!(shared.is_active("src"));
        assert!(right.try_register("src", b).is_some());
    }
}
