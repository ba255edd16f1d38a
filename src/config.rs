use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Longest wait for the next chunk before the session fails with a timeout.
    pub chunk_timeout: Option<Duration>,
    /// Use [`StrictBoundary`](crate::StrictBoundary) instead of the brace-pair scanner.
    pub strict_boundaries: bool,
    /// How many bytes of an undecodable span end up in the warning.
    pub decode_preview_bytes: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_timeout: None,
            strict_boundaries: false,
            decode_preview_bytes: 100,
        }
    }
}

#[cfg(feature = "configs")]
pub mod configuration {
    use std::time::Duration;

    use config::Config;
    use serde::Deserialize;

    use super::StreamConfig;

    #[derive(Debug, Default, Deserialize)]
    pub struct StreamSettings {
        pub chunk_timeout_ms: Option<u64>,
        pub strict_boundaries: Option<bool>,
        pub decode_preview_bytes: Option<usize>,
    }

    impl From<StreamSettings> for StreamConfig {
        fn from(settings: StreamSettings) -> Self {
            let defaults = StreamConfig::default();
            Self {
                chunk_timeout: settings.chunk_timeout_ms.map(Duration::from_millis),
                strict_boundaries: settings
                    .strict_boundaries
                    .unwrap_or(defaults.strict_boundaries),
                decode_preview_bytes: settings
                    .decode_preview_bytes
                    .unwrap_or(defaults.decode_preview_bytes),
            }
        }
    }

    /// Reads `path` (any format `config` understands), overridden by
    /// `OBJECT_STREAM_*` environment variables.
    pub fn load_config(path: &str) -> Result<StreamConfig, config::ConfigError> {
        let settings = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("OBJECT_STREAM"))
            .build()?;

        settings.try_deserialize::<StreamSettings>().map(Into::into)
    }
}
