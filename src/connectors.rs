use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::{Client, Method, Url};
use tracing::{debug, instrument};

use crate::{ChunkStream, Transport, TransportError};

#[derive(Clone, Debug)]
pub enum AuthMethod {
    BearerToken(String),
    ApiKey { key: String, header: String },
}

#[derive(Clone, Debug)]
pub struct HttpConfig {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub connect_timeout: Duration,
    pub auth: Option<AuthMethod>,
    pub query_params: Vec<(String, String)>,
    /// Ask intermediaries for a fresh response instead of a cached one.
    pub bypass_cache: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            connect_timeout: Duration::from_secs(30),
            auth: None,
            query_params: Vec::new(),
            bypass_cache: true,
        }
    }
}

/// Streams response bodies with reqwest. The source identifier is the URL.
///
/// No overall request timeout is applied, since a body may legitimately
/// stream for a long time; use `StreamConfig::chunk_timeout` to bound stalls.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn build_url(&self, source: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(source).map_err(|e| TransportError::Config(e.to_string()))?;
        if !self.config.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                self.config
                    .query_params
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth {
            Some(AuthMethod::BearerToken(token)) => request.bearer_auth(token),
            Some(AuthMethod::ApiKey { key, header }) => request.header(header, key),
            None => request,
        }
    }

    /// Builds the request for `source` without sending it.
    pub(crate) fn request(&self, source: &str) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = self.build_url(source)?;
        let mut request = self
            .client
            .request(self.config.method.clone(), url)
            .headers(self.config.headers.clone());
        if self.config.bypass_cache {
            request = request.header(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }
        request = self.apply_auth(request);
        if let Some(body) = &self.config.body {
            request = request.body(body.clone());
        }
        Ok(request)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self))]
    async fn open(&self, source: &str) -> Result<ChunkStream, TransportError> {
        let request = self.request(source)?;
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: source.to_string(),
                status: status.as_u16(),
            });
        }
        debug!(%status, "Response headers received");

        Ok(response.bytes_stream().map_err(TransportError::from).boxed())
    }
}
