//! `SteamDig`, the async facade callers use.
//!
//! # Design
//! Construction stores the key and spawns a detached probe that looks up a
//! fixed account to find out whether the key works. The probe publishes
//! its verdict once through a `watch` channel; queries only ever read it.
//!
//! Every query runs two guards in order. A rejected key makes the query
//! return `Ok(None)` quietly; a blank argument fails with
//! `InvalidArgument`. Only then is a single request sent. A query that
//! passes the first guard while the probe is still in flight is not
//! cancelled if the probe later rejects the key.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error};

use crate::client::{classify_probe, SteamRequests};
use crate::config::SteamConfig;
use crate::error::{ProbeFailure, SteamError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CredentialStatus, FriendEntry, GameEntry, NewsItem, NewsQuery, UserProfile};

#[derive(Clone)]
pub struct SteamDig {
    api_key: String,
    requests: SteamRequests,
    transport: Arc<dyn Transport>,
    status: watch::Receiver<CredentialStatus>,
}

impl SteamDig {
    /// Build a client that talks to the Steam Web API over reqwest.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: SteamConfig) -> Result<Self, SteamError> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over any `Transport`. Spawns the validation probe
    /// onto the current Tokio runtime and returns without waiting for it.
    pub fn with_transport(config: SteamConfig, transport: Arc<dyn Transport>) -> Result<Self, SteamError> {
        let requests = SteamRequests::new(&config.base_url)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| SteamError::NoRuntime)?;
        let api_key = config.api_key.trim().to_string();

        if api_key.is_empty() {
            error!(reason = %ProbeFailure::MissingKey, "Steam Web API key rejected");
            let (_, status) = watch::channel(CredentialStatus::Invalid(ProbeFailure::MissingKey));
            return Ok(Self {
                api_key,
                requests,
                transport,
                status,
            });
        }

        let (publish, status) = watch::channel(CredentialStatus::Unvalidated);
        let probe = requests.build_player_summaries(&api_key, &config.probe_steam_id);
        let probe_transport = Arc::clone(&transport);
        runtime.spawn(async move {
            let outcome = probe_transport.execute(probe).await;
            let verdict = classify_probe(&outcome);
            match verdict {
                CredentialStatus::Invalid(reason) => {
                    error!(%reason, "Steam Web API key rejected");
                }
                _ => debug!("Steam Web API key validated"),
            }
            publish.send_replace(verdict);
        });

        Ok(Self {
            api_key,
            requests,
            transport,
            status,
        })
    }

    /// The key's status as of now.
    pub fn status(&self) -> CredentialStatus {
        *self.status.borrow()
    }

    /// Wait until the validation probe has settled and return its verdict.
    pub async fn validated(&self) -> CredentialStatus {
        let mut status = self.status.clone();
        let settled = status.wait_for(CredentialStatus::is_settled).await.map(|s| *s);
        // The probe always publishes before dropping its sender, so an
        // error here still leaves the final value behind.
        settled.unwrap_or_else(|_| *status.borrow())
    }

    /// Look up the profile summary of `steam_id`.
    pub async fn get_user(&self, steam_id: &str) -> Result<Option<UserProfile>, SteamError> {
        let Some(key) = self.credential() else {
            return Ok(None);
        };
        let steam_id = required(steam_id, "a Steam ID must be specified")?;

        let response = self.send("GetPlayerSummaries", self.requests.build_player_summaries(key, steam_id)).await?;
        self.requests.parse_player_summaries(response).map(Some)
    }

    /// Games owned by `steam_id`. Private profiles yield an empty list.
    pub async fn get_games(&self, steam_id: &str) -> Result<Option<Vec<GameEntry>>, SteamError> {
        let Some(key) = self.credential() else {
            return Ok(None);
        };
        let steam_id = required(steam_id, "a Steam ID must be specified")?;

        let response = self.send("GetOwnedGames", self.requests.build_owned_games(key, steam_id)).await?;
        self.requests.parse_owned_games(response).map(Some)
    }

    /// The latest three news articles for `game_id`, 300 characters each.
    pub async fn get_news(&self, game_id: &str) -> Result<Option<Vec<NewsItem>>, SteamError> {
        self.get_news_with(game_id, NewsQuery::default()).await
    }

    /// News for `game_id`; `count` and `max_length` are forwarded verbatim.
    pub async fn get_news_with(&self, game_id: &str, query: NewsQuery) -> Result<Option<Vec<NewsItem>>, SteamError> {
        if self.credential().is_none() {
            return Ok(None);
        }
        let game_id = required(game_id, "a game ID must be specified")?;

        let response = self.send("GetNewsForApp", self.requests.build_news(game_id, query)).await?;
        self.requests.parse_news(response).map(Some)
    }

    /// Entries of `steam_id`'s friend list, as the remote sent them.
    pub async fn get_friends(&self, steam_id: &str) -> Result<Option<Vec<FriendEntry>>, SteamError> {
        let Some(key) = self.credential() else {
            return Ok(None);
        };
        let steam_id = required(steam_id, "a Steam ID must be specified")?;

        let response = self.send("GetFriendList", self.requests.build_friend_list(key, steam_id)).await?;
        self.requests.parse_friend_list(response).map(Some)
    }

    /// Whether `second_id` appears in the friend list of `first_id`.
    pub async fn are_friends(&self, first_id: &str, second_id: &str) -> Result<Option<bool>, SteamError> {
        if self.credential().is_none() {
            return Ok(None);
        }
        let first_id = required(first_id, "the first Steam ID must be specified")?;
        let second_id = required(second_id, "the second Steam ID must be specified")?;
        if first_id == second_id {
            return Err(SteamError::InvalidArgument(
                "cannot compare an account to itself".to_string(),
            ));
        }

        let Some(friends) = self.get_friends(first_id).await? else {
            return Ok(None);
        };
        Ok(Some(friends.iter().any(|friend| friend.steam_id == second_id)))
    }

    fn credential(&self) -> Option<&str> {
        self.status.borrow().permits_requests().then_some(self.api_key.as_str())
    }

    async fn send(&self, endpoint: &'static str, request: HttpRequest) -> Result<HttpResponse, SteamError> {
        debug!(endpoint, "querying Steam Web API");
        Ok(self.transport.execute(request).await?)
    }
}

impl fmt::Debug for SteamDig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamDig")
            .field("base_url", &self.requests.base_url())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str, SteamError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SteamError::InvalidArgument(message.to_string()));
    }
    Ok(value)
}
