//! Result objects handed to callers, and the remote envelopes they are read
//! from.
//!
//! # Design
//! `UserProfile` and `FriendEntry` keep every field the remote sent: the
//! few that callers commonly need are named, the rest land in `extra`, and
//! serializing either one reproduces the remote record. `GameEntry` and
//! `NewsItem` are reshaped into smaller objects with their own field names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProbeFailure;

/// A player summary as returned by `GetPlayerSummaries`. Only `steamid`
/// is required; absent fields stay absent when serialized back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(rename = "steamid")]
    pub steam_id: String,
    #[serde(rename = "personaname", default, skip_serializing_if = "Option::is_none")]
    pub persona_name: Option<String>,
    #[serde(rename = "profileurl", default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Remaining fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One game owned by an account. `time` is the lifetime play time in
/// minutes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntry {
    pub id: u32,
    pub name: String,
    pub time: u64,
}

/// One news article about a game. `date` is a Unix timestamp in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub content: String,
    pub date: i64,
}

/// An entry of `GetFriendList`, kept in the remote shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FriendEntry {
    #[serde(rename = "steamid")]
    pub steam_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friend_since: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options forwarded verbatim to `GetNewsForApp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsQuery {
    /// How many articles to ask for.
    pub count: u32,
    /// Characters of content per article; the remote truncates.
    pub max_length: u32,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            count: 3,
            max_length: 300,
        }
    }
}

/// What the client currently knows about its API key.
///
/// Starts `Unvalidated` (or `Invalid(MissingKey)` for a blank key) and is
/// moved exactly once by the validation probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Unvalidated,
    Valid,
    Invalid(ProbeFailure),
}

impl CredentialStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, CredentialStatus::Unvalidated)
    }

    /// Queries are only sent while the key has not been rejected.
    pub fn permits_requests(&self) -> bool {
        !matches!(self, CredentialStatus::Invalid(_))
    }
}

// ---------------------------------------------------------------------------
// Remote envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct PlayerSummariesEnvelope {
    pub response: PlayerSummaries,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlayerSummaries {
    #[serde(default)]
    pub players: Vec<UserProfile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnedGamesEnvelope {
    pub response: OwnedGames,
}

/// Private profiles and accounts without games come back as `{}`.
#[derive(Debug, Deserialize)]
pub(crate) struct OwnedGames {
    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnedGame {
    pub appid: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub playtime_forever: u64,
}

impl From<OwnedGame> for GameEntry {
    fn from(game: OwnedGame) -> Self {
        Self {
            id: game.appid,
            name: game.name,
            time: game.playtime_forever,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppNewsEnvelope {
    pub appnews: AppNews,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppNews {
    #[serde(default)]
    pub newsitems: Vec<RawNewsItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNewsItem {
    pub gid: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub contents: String,
    pub date: i64,
}

impl From<RawNewsItem> for NewsItem {
    fn from(article: RawNewsItem) -> Self {
        Self {
            id: article.gid,
            title: article.title,
            url: article.url,
            author: article.author,
            content: article.contents,
            date: article.date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FriendListEnvelope {
    pub friendslist: FriendList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FriendList {
    pub friends: Vec<FriendEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_keeps_unnamed_fields() {
        let raw = r#"{
            "steamid": "76561197960435530",
            "personaname": "Robin",
            "profileurl": "https://steamcommunity.com/id/robinwalker/",
            "avatar": "https://avatars.steamstatic.com/a.jpg",
            "communityvisibilitystate": 3,
            "loccountrycode": "US"
        }"#;
        let profile: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.steam_id, "76561197960435530");
        assert_eq!(profile.persona_name.as_deref(), Some("Robin"));
        assert_eq!(profile.extra["communityvisibilitystate"], 3);

        let back = serde_json::to_value(&profile).unwrap();
        let remote: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(back, remote);
    }

    #[test]
    fn sparse_records_round_trip() {
        let raw = r#"{"steamid":"76561197960435530","personaname":"Robin","personastate":0}"#;
        let profile: UserProfile = serde_json::from_str(raw).unwrap();
        assert!(profile.avatar.is_none());
        assert!(profile.profile_url.is_none());
        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(raw).unwrap());

        let raw = r#"{"steamid":"2","relationship":"friend"}"#;
        let friend: FriendEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(friend.relationship.as_deref(), Some("friend"));
        assert!(friend.friend_since.is_none());
        let back = serde_json::to_value(&friend).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(raw).unwrap());
    }

    #[test]
    fn owned_games_tolerate_missing_list() {
        let envelope: OwnedGamesEnvelope = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert!(envelope.response.games.is_empty());
    }

    #[test]
    fn owned_game_maps_to_entry() {
        let game: OwnedGame =
            serde_json::from_str(r#"{"appid":620,"name":"Portal 2","playtime_forever":1234,"img_icon_url":"x"}"#)
                .unwrap();
        let entry = GameEntry::from(game);
        assert_eq!(
            entry,
            GameEntry {
                id: 620,
                name: "Portal 2".to_string(),
                time: 1234,
            }
        );
    }

    #[test]
    fn news_item_renames_fields() {
        let raw: RawNewsItem = serde_json::from_str(
            r#"{"gid":"5112","title":"Patch","url":"https://x","author":"Valve","contents":"Fixes","date":1700000000,"feedname":"steam_community_announcements"}"#,
        )
        .unwrap();
        let item = NewsItem::from(raw);
        assert_eq!(item.id, "5112");
        assert_eq!(item.content, "Fixes");
        assert_eq!(item.date, 1_700_000_000);
    }

    #[test]
    fn news_query_defaults() {
        let query = NewsQuery::default();
        assert_eq!(query.count, 3);
        assert_eq!(query.max_length, 300);
    }

    #[test]
    fn only_rejected_keys_block_requests() {
        assert!(CredentialStatus::Unvalidated.permits_requests());
        assert!(CredentialStatus::Valid.permits_requests());
        assert!(!CredentialStatus::Invalid(ProbeFailure::InvalidKey).permits_requests());
        assert!(!CredentialStatus::Unvalidated.is_settled());
    }
}
