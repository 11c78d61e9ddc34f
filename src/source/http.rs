//! Feed source served over HTTP

use super::{FeedSource, SourceError};
use crate::feed::UpdateFeed;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Url};

pub struct HttpSource {
    client: Client,
    url: Url,
    location: String,
    bypass_cache: bool,
}

impl HttpSource {
    pub fn new(client: Client, url: Url, bypass_cache: bool) -> Self {
        let location = url.to_string();
        Self {
            client,
            url,
            location,
            bypass_cache,
        }
    }
}

#[async_trait::async_trait]
impl FeedSource for HttpSource {
    async fn fetch(&self) -> Result<UpdateFeed, SourceError> {
        let mut request = self.client.get(self.url.clone());
        if self.bypass_cache {
            request = request
                .header(CACHE_CONTROL, "no-store")
                .header(PRAGMA, "no-cache");
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::from_response(response).await);
        }

        let body = response.bytes().await?;
        Ok(UpdateFeed::from_json_slice(&body)?)
    }

    fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn source(server: &MockServer, path: &str, bypass_cache: bool) -> HttpSource {
        let url = Url::parse(&server.url(path)).unwrap();
        HttpSource::new(Client::new(), url, bypass_cache)
    }

    #[tokio::test]
    async fn test_fetch_decodes_feed() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/updates");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"updates":[{"version":"v6","date":"2024-01-01","notes":["fix A"]}]}"#);
            })
            .await;

        let feed = source(&server, "/api/updates", false).fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.updates[0].notes, vec!["fix A"]);
    }

    #[tokio::test]
    async fn test_fallback_request_disables_cache() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/data/updates.json")
                    .header("cache-control", "no-store")
                    .header("pragma", "no-cache");
                then.status(200).body(r#"{"updates":[]}"#);
            })
            .await;

        let feed = source(&server, "/data/updates.json", true)
            .fetch()
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/updates");
                then.status(503).body("maintenance");
            })
            .await;

        match source(&server, "/api/updates", false).fetch().await {
            Err(SourceError::Http { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_html_error_page_is_not_copied_into_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/updates.json");
                then.status(404)
                    .header("content-type", "text/html")
                    .body("<html><body><h1>404</h1><p>Page not found</p></body></html>");
            })
            .await;

        match source(&server, "/data/updates.json", true).fetch().await {
            Err(SourceError::Http { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_html_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/updates.json");
                then.status(200).body("<!doctype html><p>Not here</p>");
            })
            .await;

        let result = source(&server, "/data/updates.json", true).fetch().await;
        assert!(matches!(result, Err(SourceError::Decode(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let url = Url::parse("http://127.0.0.1:9/api/updates").unwrap();
        let result = HttpSource::new(Client::new(), url, false).fetch().await;
        assert!(matches!(result, Err(SourceError::Reqwest(_))));
    }

    #[test]
    fn test_location_is_full_url() {
        let url = Url::parse("https://example.com/api/updates").unwrap();
        let source = HttpSource::new(Client::new(), url, false);
        assert_eq!(source.location(), "https://example.com/api/updates");
    }
}
