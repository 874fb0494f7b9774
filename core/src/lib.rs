//! Async client for a handful of read-only Steam Web API queries.
//!
//! # Overview
//! `SteamDig` holds an API key, validates it in the background at
//! construction, and offers typed queries (player summaries, owned games,
//! app news, friend lists) that each issue one GET and reshape the JSON.
//!
//! # Design
//! - `SteamRequests` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network.
//! - A `Transport` executes the round-trip; `ReqwestTransport` is the
//!   default, tests plug in their own.
//! - The key's validity is an explicit `CredentialStatus`, written once by
//!   the probe and read by every query.
//! - No retries, caching, pagination or rate limiting.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod steam;
pub mod transport;
pub mod types;

pub use client::{classify_probe, SteamRequests};
pub use config::SteamConfig;
pub use error::{ProbeFailure, SteamError, TransportFailure};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use steam::SteamDig;
pub use transport::{ReqwestTransport, Transport};
pub use types::{CredentialStatus, FriendEntry, GameEntry, NewsItem, NewsQuery, UserProfile};
