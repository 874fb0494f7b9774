//! Error types for the Steam Web API client.
//!
//! # Design
//! `SteamError` is what callers of `SteamDig` see. Missing arguments,
//! absent accounts and empty news feeds each get a dedicated variant so
//! callers can branch on them. `Transport` covers both connection failures
//! and non-2xx statuses; its message is generic and the
//! underlying cause is only logged.
//!
//! `ProbeFailure` is never returned from a call. It is recorded in the
//! client's `CredentialStatus` when the key validation probe fails.

use thiserror::Error;

/// Errors returned by `SteamDig` queries and the `SteamRequests` parsers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SteamError {
    /// A required identifier was blank, or two identifiers that must differ
    /// were equal. Raised before any request is sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The request failed at the transport level or the remote answered
    /// with a non-2xx status.
    #[error("an error occurred while contacting the Steam Web API")]
    Transport { status: Option<u16> },

    /// The response was well formed but holds no record for the account.
    #[error("this Steam ID does not exist")]
    NotFound,

    /// The news feed for the game came back empty.
    #[error("no news for this game")]
    NoResults,

    /// A 2xx response body did not match the documented schema.
    #[error("malformed Steam Web API response: {0}")]
    MalformedResponse(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// `SteamDig` was constructed outside of a Tokio runtime, so the
    /// validation probe could not be spawned.
    #[error("a Tokio runtime is required to construct the client")]
    NoRuntime,
}

/// Why the validation probe rejected the API key.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The key was blank; no probe was sent.
    #[error("Steam Web API key is missing")]
    MissingKey,

    #[error("Steam Web API key is invalid")]
    InvalidKey,

    #[error("Steam Web API is unavailable")]
    ServiceUnavailable,
}

/// A request could not be carried out: connection refused, DNS failure,
/// timeout, truncated body. The message never contains the request URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("transport failure: {0}")]
pub struct TransportFailure(pub String);

impl From<TransportFailure> for SteamError {
    fn from(failure: TransportFailure) -> Self {
        tracing::debug!(cause = %failure, "Steam Web API request failed");
        SteamError::Transport { status: None }
    }
}
