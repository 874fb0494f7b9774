use std::sync::Arc;

use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Fixtures, MockState, GABE, LONER, ROBIN, TEST_API_KEY};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- player summaries ---

#[tokio::test]
async fn player_summaries_returns_requested_player() {
    let resp = app()
        .oneshot(get(&format!(
            "/ISteamUser/GetPlayerSummaries/v0002/?key={TEST_API_KEY}&steamids={ROBIN}"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let players = body["response"]["players"].as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["steamid"], ROBIN);
    assert_eq!(players[0]["personaname"], "Robin");
}

#[tokio::test]
async fn player_summaries_unknown_account_is_empty_list() {
    let resp = app()
        .oneshot(get(&format!(
            "/ISteamUser/GetPlayerSummaries/v0002/?key={TEST_API_KEY}&steamids=1"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["response"]["players"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn player_summaries_bad_key_returns_403() {
    let resp = app()
        .oneshot(get(&format!("/ISteamUser/GetPlayerSummaries/v0002/?key=WRONG&steamids={ROBIN}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- owned games ---

#[tokio::test]
async fn owned_games_include_names_with_app_info() {
    let resp = app()
        .oneshot(get(&format!(
            "/IPlayerService/GetOwnedGames/v0001/?key={TEST_API_KEY}&steamid={ROBIN}&include_appinfo=true"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["response"]["game_count"], 3);
    assert_eq!(body["response"]["games"][1]["name"], "Team Fortress 2");
    assert_eq!(body["response"]["games"][1]["playtime_forever"], 1440);
}

#[tokio::test]
async fn owned_games_without_app_info_omit_names() {
    let resp = app()
        .oneshot(get(&format!(
            "/IPlayerService/GetOwnedGames/v0001/?key={TEST_API_KEY}&steamid={ROBIN}"
        )))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert!(body["response"]["games"][0].get("name").is_none());
}

#[tokio::test]
async fn owned_games_private_profile_has_no_list() {
    let resp = app()
        .oneshot(get(&format!(
            "/IPlayerService/GetOwnedGames/v0001/?key={TEST_API_KEY}&steamid={LONER}&include_appinfo=true"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "response": {} }));
}

// --- news ---

#[tokio::test]
async fn news_honors_count_and_max_length() {
    let resp = app()
        .oneshot(get("/ISteamNews/GetNewsForApp/v0002/?appid=440&count=2&maxLength=40&format=json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let items = body["appnews"]["newsitems"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(body["appnews"]["count"], 5);
    for item in items {
        assert!(item["contents"].as_str().unwrap().chars().count() <= 40);
    }
}

#[tokio::test]
async fn news_unknown_app_is_empty() {
    let resp = app()
        .oneshot(get("/ISteamNews/GetNewsForApp/v0002/?appid=620&count=3&maxLength=300&format=json"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert!(body["appnews"]["newsitems"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn news_bad_appid_returns_400() {
    let resp = app()
        .oneshot(get("/ISteamNews/GetNewsForApp/v0002/?appid=tf2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- friends ---

#[tokio::test]
async fn friend_list_returns_friends() {
    let resp = app()
        .oneshot(get(&format!(
            "/ISteamUser/GetFriendList/v0001/?key={TEST_API_KEY}&steamid={ROBIN}&relationship=friend"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let friends = body["friendslist"]["friends"].as_array().unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["steamid"], GABE);
    assert_eq!(friends[0]["relationship"], "friend");
}

#[tokio::test]
async fn friend_list_private_profile_returns_401() {
    let resp = app()
        .oneshot(get(&format!(
            "/ISteamUser/GetFriendList/v0001/?key={TEST_API_KEY}&steamid={LONER}&relationship=friend"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- availability switch ---

#[tokio::test]
async fn unavailable_switch_affects_every_route() {
    use tower::Service;

    let state = Arc::new(MockState::new(Fixtures::sample()));
    let mut app = app_with(Arc::clone(&state)).into_service();
    let uri = format!("/ISteamUser/GetPlayerSummaries/v0002/?key={TEST_API_KEY}&steamids={ROBIN}");

    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    state.set_unavailable(true);
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/ISteamNews/GetNewsForApp/v0002/?appid=440"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    state.set_unavailable(false);
    let resp = ServiceExt::ready(&mut app).await.unwrap().call(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
