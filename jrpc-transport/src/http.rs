// Blocking HTTP transport: one POST per execution, the response body is the
// JSON-RPC answer.

use crate::{Transport, TransportError};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, trace};

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// JSON-RPC endpoint
    pub url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Extra headers sent with every request (auth tokens and the like)
    pub headers: Vec<(String, String)>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/rpc".to_string(),
            timeout_ms: 30000,
            headers: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct HttpTransport {
    config: HttpTransportConfig,
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Default configuration pointed at `url`.
    pub fn with_url(url: &str) -> Result<Self, TransportError> {
        Self::new(HttpTransportConfig {
            url: url.to_string(),
            ..Default::default()
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    fn pass(&self, request: &str) -> Result<String, TransportError> {
        debug!(url = %self.config.url, bytes = request.len(), "Sending JSON-RPC request");
        trace!("Request body: {}", request);

        let mut builder = self
            .http_client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.to_string()).send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        trace!("Response body: {}", text);
        Ok(text)
    }
}
