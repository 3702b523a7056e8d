//! HTTP delivery to a remote revalidation endpoint.
//!
//! [`HttpInvalidationSink`] POSTs `{"path": ..., "secret": ...}` to
//! `{SITE_URL}/api/revalidate`, one request per path. There is no retry:
//! a failed request is reported to the notifier, which logs it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::notifier::{InvalidationSink, NotifyError};

/// Path of the revalidation endpoint relative to the site URL.
pub const REVALIDATE_ENDPOINT: &str = "/api/revalidate";

/// HTTP request timeout for a single invalidation.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct RevalidateBody<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<&'a str>,
}

/// Sends invalidations to a site's `/api/revalidate` endpoint.
pub struct HttpInvalidationSink {
    client: reqwest::Client,
    endpoint: String,
    secret: Option<String>,
}

impl HttpInvalidationSink {
    /// Build a sink for the site at `site_url` (scheme and host, with or
    /// without a trailing slash).
    pub fn new(site_url: &str, secret: Option<String>) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint_url(site_url),
            secret,
        })
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_url(site_url: &str) -> String {
    format!("{}{REVALIDATE_ENDPOINT}", site_url.trim_end_matches('/'))
}

#[async_trait]
impl InvalidationSink for HttpInvalidationSink {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn invalidate(&self, path: &str) -> Result<(), NotifyError> {
        let body = RevalidateBody {
            path,
            secret: self.secret.as_deref(),
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn endpoint_strips_trailing_slash() {
        assert_eq!(
            endpoint_url("https://example.com/"),
            "https://example.com/api/revalidate"
        );
        assert_eq!(
            endpoint_url("http://localhost:3000"),
            "http://localhost:3000/api/revalidate"
        );
    }

    #[test]
    fn body_omits_missing_secret() {
        let body = RevalidateBody {
            path: "/page/a",
            secret: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"path": "/page/a"})
        );
    }

    #[tokio::test]
    async fn unreachable_site_is_a_request_error() {
        // Grab a free port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = HttpInvalidationSink::new(&format!("http://{addr}"), None).unwrap();
        let result = sink.invalidate("/").await;
        assert_matches!(result, Err(NotifyError::Request(_)));
    }
}
