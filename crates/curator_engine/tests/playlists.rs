use curator_core::{Enrichable, FailureKind, PlaylistItemType};
use curator_engine::{ApiSettings, LinkData, NewPlaylist, PlaylistUpdate, ReqwestCurationApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestCurationApi {
    ReqwestCurationApi::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("client")
}

fn playlist_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Reading list",
        "description": "weekend",
        "isPublic": false,
        "items": [
            {"id": 1, "itemId": 100, "itemType": "LINK", "displayOrder": 1, "url": "https://b.example"},
            {"id": 2, "itemId": 101, "itemType": "CURATION", "displayOrder": 0}
        ]
    })
}

#[tokio::test]
async fn lists_and_fetches_playlists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-1",
            "data": [playlist_json(1), playlist_json(2)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/playlists/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-2",
            "data": playlist_json(2)
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let all = api.playlists().await.expect("list");
    assert_eq!(all.len(), 2);

    let playlist = api.playlist(2).await.expect("playlist");
    assert!(!playlist.is_public);
    let order: Vec<_> = playlist
        .ordered_items()
        .iter()
        .map(|item| item.item_type)
        .collect();
    assert_eq!(order, vec![PlaylistItemType::Curation, PlaylistItemType::Link]);
    assert_eq!(playlist.links(), vec!["https://b.example"]);
}

#[tokio::test]
async fn create_and_update_send_camel_case_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/playlists"))
        .and(body_json(json!({
            "title": "New",
            "description": "desc",
            "isPublic": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "201-1",
            "data": playlist_json(5)
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/playlists/5"))
        .and(body_json(json!({
            "title": "Renamed",
            "description": "desc",
            "thumbnailUrl": "https://t.example/a.png"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-1",
            "data": playlist_json(5)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let created = api
        .create_playlist(&NewPlaylist {
            title: "New".to_string(),
            description: "desc".to_string(),
            is_public: true,
            thumbnail_url: None,
        })
        .await
        .expect("create");
    assert_eq!(created.id, 5);

    api.update_playlist(
        5,
        &PlaylistUpdate {
            title: "Renamed".to_string(),
            description: "desc".to_string(),
            thumbnail_url: Some("https://t.example/a.png".to_string()),
        },
    )
    .await
    .expect("update");
}

#[tokio::test]
async fn item_operations_hit_item_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/playlists/5/items/link"))
        .and(body_json(json!({"url": "https://c.example"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-1",
            "data": playlist_json(5)
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/playlists/5/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/playlists/5/items/order"))
        .and(body_json(json!([2, 1])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-1",
            "data": playlist_json(5)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.add_link_item(5, &LinkData::new("https://c.example"))
        .await
        .expect("add");
    api.delete_item(5, 1).await.expect("delete");
    api.reorder_items(5, &[2, 1]).await.expect("reorder");
}

#[tokio::test]
async fn recommendation_failure_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/playlists/9/recommendation"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = api_for(&server).recommendations(9).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn liked_playlists_reject_error_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/playlists/liked"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "401-1",
            "msg": "login required"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).liked_playlists().await.unwrap_err();
    assert_eq!(err.message, "login required");
}
