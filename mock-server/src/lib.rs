use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Key accepted by the sample fixtures.
pub const TEST_API_KEY: &str = "TESTKEY";

pub const ROBIN: &str = "76561197960435530";
pub const GABE: &str = "76561197960287930";
/// Has a profile but a private friend list and no games.
pub const LONER: &str = "76561198000000001";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub steamid: String,
    pub personaname: String,
    pub profileurl: String,
    pub avatar: String,
    pub avatarmedium: String,
    pub avatarfull: String,
    pub personastate: u8,
    pub communityvisibilitystate: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnedGame {
    pub appid: u32,
    pub name: String,
    pub playtime_forever: u64,
    pub img_icon_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsItem {
    pub gid: String,
    pub title: String,
    pub url: String,
    pub is_external_url: bool,
    pub author: String,
    pub contents: String,
    pub feedlabel: String,
    pub date: i64,
    pub feedname: String,
    pub appid: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Friend {
    pub steamid: String,
    pub relationship: String,
    pub friend_since: u64,
}

/// Everything the mock API knows about.
#[derive(Clone, Debug, Default)]
pub struct Fixtures {
    pub api_keys: HashSet<String>,
    pub players: Vec<Player>,
    pub owned_games: HashMap<String, Vec<OwnedGame>>,
    pub news: HashMap<u32, Vec<NewsItem>>,
    /// Accounts missing from this map have a private friend list.
    pub friends: HashMap<String, Vec<Friend>>,
}

impl Fixtures {
    pub fn sample() -> Self {
        let player = |steamid: &str, name: &str| Player {
            steamid: steamid.to_string(),
            personaname: name.to_string(),
            profileurl: format!("https://steamcommunity.com/profiles/{steamid}/"),
            avatar: format!("https://avatars.steamstatic.com/{steamid}.jpg"),
            avatarmedium: format!("https://avatars.steamstatic.com/{steamid}_medium.jpg"),
            avatarfull: format!("https://avatars.steamstatic.com/{steamid}_full.jpg"),
            personastate: 0,
            communityvisibilitystate: 3,
        };
        let game = |appid: u32, name: &str, playtime_forever: u64| OwnedGame {
            appid,
            name: name.to_string(),
            playtime_forever,
            img_icon_url: format!("{appid:x}"),
        };
        let friend = |steamid: &str, friend_since: u64| Friend {
            steamid: steamid.to_string(),
            relationship: "friend".to_string(),
            friend_since,
        };
        let article = |n: u32| NewsItem {
            gid: format!("51262{n:05}"),
            title: format!("Team Fortress 2 Update {n}"),
            url: format!("https://steamstore-a.akamaihd.net/news/externalpost/tf2_blog/51262{n:05}"),
            is_external_url: true,
            author: "Valve".to_string(),
            contents: format!("Update {n}: fixed a client crash. {}", "Balance changes. ".repeat(30)),
            feedlabel: "TF2 Blog".to_string(),
            date: 1_700_000_000 - i64::from(n) * 86_400,
            feedname: "tf2_blog".to_string(),
            appid: 440,
        };

        Self {
            api_keys: HashSet::from([TEST_API_KEY.to_string()]),
            players: vec![
                player(ROBIN, "Robin"),
                player(GABE, "Rabscuttle"),
                player(LONER, "Loner"),
            ],
            owned_games: HashMap::from([
                (
                    ROBIN.to_string(),
                    vec![
                        game(10, "Counter-Strike", 32),
                        game(440, "Team Fortress 2", 1440),
                        game(620, "Portal 2", 0),
                    ],
                ),
                (GABE.to_string(), Vec::new()),
            ]),
            news: HashMap::from([(440, (1..=5).map(article).collect())]),
            friends: HashMap::from([
                (ROBIN.to_string(), vec![friend(GABE, 1_262_304_000)]),
                (GABE.to_string(), vec![friend(ROBIN, 1_262_304_000)]),
            ]),
        }
    }
}

/// Fixtures plus a switch that makes every route answer 503.
#[derive(Debug, Default)]
pub struct MockState {
    pub fixtures: Fixtures,
    unavailable: AtomicBool,
}

impl MockState {
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            fixtures,
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StatusCode> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
        Ok(())
    }

    fn authorize(&self, key: Option<&str>) -> Result<(), StatusCode> {
        self.check_available()?;
        match key {
            Some(key) if self.fixtures.api_keys.contains(key) => Ok(()),
            _ => Err(StatusCode::FORBIDDEN),
        }
    }
}

pub type Db = Arc<MockState>;

pub fn app() -> Router {
    app_with(Arc::new(MockState::new(Fixtures::sample())))
}

pub fn app_with(state: Db) -> Router {
    Router::new()
        .route("/ISteamUser/GetPlayerSummaries/v0002/", get(player_summaries))
        .route("/IPlayerService/GetOwnedGames/v0001/", get(owned_games))
        .route("/ISteamNews/GetNewsForApp/v0002/", get(app_news))
        .route("/ISteamUser/GetFriendList/v0001/", get(friend_list))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, state: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

#[derive(Deserialize)]
pub struct PlayerSummariesParams {
    pub key: Option<String>,
    pub steamids: Option<String>,
}

#[derive(Deserialize)]
pub struct AccountParams {
    pub key: Option<String>,
    pub steamid: Option<String>,
    pub include_appinfo: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Deserialize)]
pub struct NewsParams {
    pub appid: Option<u32>,
    pub count: Option<usize>,
    #[serde(rename = "maxLength")]
    pub max_length: Option<usize>,
}

async fn player_summaries(
    State(db): State<Db>,
    Query(params): Query<PlayerSummariesParams>,
) -> Result<Json<Value>, StatusCode> {
    db.authorize(params.key.as_deref())?;
    let ids = params.steamids.ok_or(StatusCode::BAD_REQUEST)?;
    let wanted: HashSet<&str> = ids.split(',').map(str::trim).collect();
    let players: Vec<&Player> = db
        .fixtures
        .players
        .iter()
        .filter(|p| wanted.contains(p.steamid.as_str()))
        .collect();
    Ok(Json(json!({ "response": { "players": players } })))
}

async fn owned_games(
    State(db): State<Db>,
    Query(params): Query<AccountParams>,
) -> Result<Json<Value>, StatusCode> {
    db.authorize(params.key.as_deref())?;
    let steamid = params.steamid.ok_or(StatusCode::BAD_REQUEST)?;
    let Some(games) = db.fixtures.owned_games.get(&steamid) else {
        return Ok(Json(json!({ "response": {} })));
    };
    if games.is_empty() {
        return Ok(Json(json!({ "response": { "game_count": 0 } })));
    }

    let with_info = matches!(params.include_appinfo.as_deref(), Some("true" | "1"));
    let games: Vec<Value> = games
        .iter()
        .map(|g| {
            if with_info {
                json!(g)
            } else {
                json!({ "appid": g.appid, "playtime_forever": g.playtime_forever })
            }
        })
        .collect();
    Ok(Json(json!({ "response": { "game_count": games.len(), "games": games } })))
}

async fn app_news(
    State(db): State<Db>,
    Query(params): Query<NewsParams>,
) -> Result<Json<Value>, StatusCode> {
    db.check_available()?;
    let appid = params.appid.ok_or(StatusCode::BAD_REQUEST)?;
    let all = db.fixtures.news.get(&appid).map(Vec::as_slice).unwrap_or_default();
    let max_length = params.max_length.unwrap_or(0);

    let items: Vec<NewsItem> = all
        .iter()
        .take(params.count.unwrap_or(20))
        .cloned()
        .map(|mut item| {
            if max_length > 0 {
                item.contents = item.contents.chars().take(max_length).collect();
            }
            item
        })
        .collect();
    Ok(Json(json!({
        "appnews": { "appid": appid, "newsitems": items, "count": all.len() }
    })))
}

async fn friend_list(
    State(db): State<Db>,
    Query(params): Query<AccountParams>,
) -> Result<Json<Value>, StatusCode> {
    db.authorize(params.key.as_deref())?;
    let steamid = params.steamid.ok_or(StatusCode::BAD_REQUEST)?;
    let friends = db.fixtures.friends.get(&steamid).ok_or(StatusCode::UNAUTHORIZED)?;
    let relationship = params.relationship.unwrap_or_else(|| "all".to_string());

    let friends: Vec<&Friend> = friends
        .iter()
        .filter(|f| relationship == "all" || f.relationship == relationship)
        .collect();
    Ok(Json(json!({ "friendslist": { "friends": friends } })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_fixtures_are_consistent() {
        let fixtures = Fixtures::sample();
        assert!(fixtures.api_keys.contains(TEST_API_KEY));
        for id in fixtures.friends.keys() {
            assert!(fixtures.players.iter().any(|p| &p.steamid == id));
        }
        assert!(!fixtures.friends.contains_key(LONER));
    }

    #[test]
    fn authorize_rejects_unknown_key() {
        let state = MockState::new(Fixtures::sample());
        assert_eq!(state.authorize(Some("nope")), Err(StatusCode::FORBIDDEN));
        assert_eq!(state.authorize(None), Err(StatusCode::FORBIDDEN));
        assert_eq!(state.authorize(Some(TEST_API_KEY)), Ok(()));
    }

    #[test]
    fn unavailable_wins_over_key_check() {
        let state = MockState::new(Fixtures::sample());
        state.set_unavailable(true);
        assert_eq!(state.authorize(Some(TEST_API_KEY)), Err(StatusCode::SERVICE_UNAVAILABLE));
        state.set_unavailable(false);
        assert_eq!(state.authorize(Some(TEST_API_KEY)), Ok(()));
    }

    #[test]
    fn news_params_use_remote_names() {
        let params: NewsParams =
            serde_json::from_value(json!({ "appid": 440, "count": 2, "maxLength": 50 })).unwrap();
        assert_eq!(params.appid, Some(440));
        assert_eq!(params.max_length, Some(50));
    }
}
