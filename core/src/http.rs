//! HTTP transport types shared by the request builders and the transports.
//!
//! # Design
//! Requests and responses are plain data. `SteamRequests` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching
//! the network; a `Transport` implementation performs the actual I/O. This
//! keeps URL construction and payload mapping deterministic and lets tests
//! swap the network for a scripted transport.

/// HTTP method for a request. Every Steam Web API read used here is a GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the encoded query string,
/// including the API key where the endpoint needs one. Never log it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
}

/// An HTTP response described as plain data.
///
/// Non-2xx statuses are represented here rather than as transport
/// failures, so the parsers decide what a status means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
