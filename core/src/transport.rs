//! The I/O seam: something that can execute an `HttpRequest`.
//!
//! `ReqwestTransport` is the production implementation. Tests substitute
//! their own `Transport` to script responses and count calls.

use async_trait::async_trait;

use crate::config::SteamConfig;
use crate::error::{SteamError, TransportFailure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations return non-2xx responses as `Ok`; only failures to get
/// a response at all are `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &SteamConfig) -> Result<Self, SteamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SteamError::Config(format!("cannot build HTTP client: {}", e.without_url())))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
        };
        // reqwest errors embed the URL, and the URL embeds the key.
        let response = self
            .client
            .request(method, request.url.as_str())
            .send()
            .await
            .map_err(|e| TransportFailure(e.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure(e.without_url().to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
