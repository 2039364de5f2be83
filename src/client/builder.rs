use crate::client::core::Client;
use crate::codec::{JsonCodec, WireCodec};
use crate::transport::{HttpTransport, Transport};
use crate::{Error, Result};
use std::time::Duration;

/// Default API endpoint.
pub(crate) const DEFAULT_ENDPOINT: &str = "https://api.pixvault.io/2019-01-01";

/// Environment variable consulted when no API key is set explicitly.
const API_KEY_ENV: &str = "PIXVAULT_API_KEY";

/// Builder for [`Client`].
///
/// The API key is the only required setting; it falls back to the
/// `PIXVAULT_API_KEY` environment variable. A custom transport (used by
/// tests to script responses) replaces the HTTP layer entirely, in which
/// case no key or endpoint is needed.
pub struct ClientBuilder {
    api_key: Option<String>,
    endpoint: Option<String>,
    timeout: Duration,
    codec: Option<Box<dyn WireCodec>>,
    transport: Option<Box<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            timeout: Duration::from_secs(60),
            codec: None,
            transport: None,
        }
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API endpoint (primarily for pointing tests at a mock
    /// server).
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Request timeout for each exchange. Default 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wire codec. Default is [`JsonCodec`].
    pub fn codec(mut self, codec: impl WireCodec + 'static) -> Self {
        self.codec = Some(Box::new(codec));
        self
    }

    /// Inject a transport, bypassing HTTP entirely.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    pub fn build(self) -> Result<Client> {
        let codec = self.codec.unwrap_or_else(|| Box::new(JsonCodec));

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let api_key = self
                    .api_key
                    .or_else(|| std::env::var(API_KEY_ENV).ok())
                    .ok_or_else(|| {
                        Error::configuration(format!(
                            "API key required (set it on the builder or via {API_KEY_ENV})"
                        ))
                    })?;
                let endpoint = self
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
                let headers = [
                    ("Content-Type".to_string(), codec.content_type().to_string()),
                    ("Accept".to_string(), codec.content_type().to_string()),
                    ("Api-Key".to_string(), api_key),
                ];
                Box::new(HttpTransport::new(endpoint, &headers, self.timeout)?)
            }
        };

        Ok(Client::new(transport, codec))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
