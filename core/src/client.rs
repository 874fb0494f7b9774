//! Stateless request builder and response parser for the Steam Web API.
//!
//! # Design
//! `SteamRequests` holds only the API base URL. Each query is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The network round-trip happens in a
//! `Transport`, outside this module, so everything here is deterministic.

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ProbeFailure, SteamError, TransportFailure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AppNewsEnvelope, CredentialStatus, FriendEntry, FriendListEnvelope, GameEntry, NewsItem,
    NewsQuery, OwnedGamesEnvelope, PlayerSummariesEnvelope, UserProfile,
};

pub const PLAYER_SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v0002/";
pub const OWNED_GAMES_PATH: &str = "/IPlayerService/GetOwnedGames/v0001/";
pub const APP_NEWS_PATH: &str = "/ISteamNews/GetNewsForApp/v0002/";
pub const FRIEND_LIST_PATH: &str = "/ISteamUser/GetFriendList/v0001/";

const SERVICE_UNAVAILABLE: u16 = 503;

/// Builds Steam Web API requests and parses their responses without
/// touching the network.
#[derive(Debug, Clone)]
pub struct SteamRequests {
    base_url: Url,
}

impl SteamRequests {
    /// Fails if `base_url` is not an absolute http(s)-style URL.
    pub fn new(base_url: &str) -> Result<Self, SteamError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| SteamError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SteamError::Config(format!("base URL {base_url} cannot carry a path")));
        }
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn build_player_summaries(&self, api_key: &str, steam_id: &str) -> HttpRequest {
        self.get(PLAYER_SUMMARIES_PATH, &[("key", api_key), ("steamids", steam_id)])
    }

    pub fn build_owned_games(&self, api_key: &str, steam_id: &str) -> HttpRequest {
        self.get(
            OWNED_GAMES_PATH,
            &[("key", api_key), ("steamid", steam_id), ("include_appinfo", "true")],
        )
    }

    /// `GetNewsForApp` is public, so no key is sent.
    pub fn build_news(&self, game_id: &str, query: NewsQuery) -> HttpRequest {
        let count = query.count.to_string();
        let max_length = query.max_length.to_string();
        self.get(
            APP_NEWS_PATH,
            &[
                ("appid", game_id),
                ("count", &count),
                ("maxLength", &max_length),
                ("format", "json"),
            ],
        )
    }

    pub fn build_friend_list(&self, api_key: &str, steam_id: &str) -> HttpRequest {
        self.get(
            FRIEND_LIST_PATH,
            &[("key", api_key), ("steamid", steam_id), ("relationship", "friend")],
        )
    }

    /// Returns the first player of the summary, or `NotFound` when the
    /// remote knows no such account.
    pub fn parse_player_summaries(&self, response: HttpResponse) -> Result<UserProfile, SteamError> {
        let envelope: PlayerSummariesEnvelope = decode(&response)?;
        envelope.response.players.into_iter().next().ok_or(SteamError::NotFound)
    }

    pub fn parse_owned_games(&self, response: HttpResponse) -> Result<Vec<GameEntry>, SteamError> {
        let envelope: OwnedGamesEnvelope = decode(&response)?;
        Ok(envelope.response.games.into_iter().map(GameEntry::from).collect())
    }

    /// An empty feed is an error here, unlike owned games.
    pub fn parse_news(&self, response: HttpResponse) -> Result<Vec<NewsItem>, SteamError> {
        let envelope: AppNewsEnvelope = decode(&response)?;
        let news: Vec<NewsItem> = envelope.appnews.newsitems.into_iter().map(NewsItem::from).collect();
        if news.is_empty() {
            return Err(SteamError::NoResults);
        }
        Ok(news)
    }

    pub fn parse_friend_list(&self, response: HttpResponse) -> Result<Vec<FriendEntry>, SteamError> {
        let envelope: FriendListEnvelope = decode(&response)?;
        Ok(envelope.friendslist.friends)
    }

    fn get(&self, path: &str, params: &[(&str, &str)]) -> HttpRequest {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{path}"));
        url.set_query(None);
        url.query_pairs_mut().extend_pairs(params);
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
        }
    }
}

/// Turn the outcome of the validation probe into the key's final status.
///
/// Any 2xx answer validates the key. A 503 means the service is down;
/// every other status, and any transport failure, rejects the key.
pub fn classify_probe(outcome: &Result<HttpResponse, TransportFailure>) -> CredentialStatus {
    match outcome {
        Ok(response) if response.is_success() => CredentialStatus::Valid,
        Ok(response) if response.status == SERVICE_UNAVAILABLE => {
            CredentialStatus::Invalid(ProbeFailure::ServiceUnavailable)
        }
        Ok(_) | Err(_) => CredentialStatus::Invalid(ProbeFailure::InvalidKey),
    }
}

/// Map non-2xx statuses to `Transport`.
fn check_status(response: &HttpResponse) -> Result<(), SteamError> {
    if response.is_success() {
        return Ok(());
    }
    tracing::debug!(status = response.status, "Steam Web API answered with an error status");
    Err(SteamError::Transport {
        status: Some(response.status),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, SteamError> {
    check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| SteamError::MalformedResponse(e.to_string()))
}
