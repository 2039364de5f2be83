use super::{HttpError, HttpErrorKind, Transport, TransportError};
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Error messages quote at most this much of the response body.
const BODY_SNIPPET_LEN: usize = 512;

/// reqwest-backed transport posting to a fixed endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Builds a transport with the endpoint, headers and timeout fixed for
    /// its lifetime.
    pub fn new(url: impl Into<String>, headers: &[(String, String)], timeout: Duration) -> Result<Self> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::configuration(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::configuration(format!("invalid header value for {name}: {e}")))?;
            header_map.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.into(),
            headers: header_map,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Vec<u8>) -> Result<Bytes> {
        let response = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await
            .map_err(TransportError::Connect)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(TransportError::Connect)?;

        if status.is_success() {
            return Ok(bytes);
        }

        let snippet = String::from_utf8_lossy(&bytes[..bytes.len().min(BODY_SNIPPET_LEN)]);
        let message = if snippet.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        } else {
            snippet.into_owned()
        };

        Err(HttpError {
            kind: HttpErrorKind::from_status(status.as_u16()),
            status: status.as_u16(),
            message,
        }
        .into())
    }
}
