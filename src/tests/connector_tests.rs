#[cfg(all(test, feature = "http"))]
mod tests {
    use reqwest::header::{AUTHORIZATION, CACHE_CONTROL};

    use crate::{AuthMethod, HttpConfig, HttpTransport, TransportError};

    #[test]
    fn test_request_bypasses_cache_and_adds_query() {
        let transport = HttpTransport::new(HttpConfig {
            query_params: vec![("limit".into(), "10".into())],
            auth: Some(AuthMethod::BearerToken("secret".into())),
            ..Default::default()
        })
        .unwrap();

        let request = transport
            .request("https://stampchain.io/stamp.json")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://stampchain.io/stamp.json?limit=10");
        assert_eq!(request.headers()[CACHE_CONTROL], "no-cache");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer secret");
    }

    #[test]
    fn test_api_key_header_without_cache_bypass() {
        let transport = HttpTransport::new(HttpConfig {
            auth: Some(AuthMethod::ApiKey {
                key: "k-123".into(),
                header: "x-api-key".into(),
            }),
            bypass_cache: false,
            ..Default::default()
        })
        .unwrap();

        let request = transport.request("https://example.com/feed").unwrap().build().unwrap();
        assert_eq!(request.headers()["x-api-key"], "k-123");
        assert!(request.headers().get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let transport = HttpTransport::new(HttpConfig::default()).unwrap();
        assert!(matches!(transport.request("not a url"), Err(TransportError::Config(_))));
    }
}
