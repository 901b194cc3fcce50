use std::time::Duration;

use curator_core::FailureKind;
use curator_engine::{ApiSettings, CurationApi, ReqwestCurationApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestCurationApi {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    ReqwestCurationApi::new(settings).expect("client")
}

#[tokio::test]
async fn profile_is_returned_on_success_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/members/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-4",
            "msg": "ok",
            "data": {"username": "alice", "nickname": "Al", "followerCount": 3}
        })))
        .mount(&server)
        .await;

    let profile = api_for(&server).fetch_profile("alice").await.expect("profile");
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.display_name(), "Al");
    assert_eq!(profile.follower_count, 3);
}

#[tokio::test]
async fn success_status_with_other_code_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/members/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "404-1",
            "msg": "member not found",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_profile("ghost").await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::Application {
            code: "404-1".to_string()
        }
    );
    assert_eq!(err.to_string(), "member not found");
}

#[tokio::test]
async fn non_success_status_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/members/alice"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_profile("alice").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.message, "HTTP error! status: 503");
}

#[tokio::test]
async fn http_error_prefers_envelope_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/members/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "401-1",
            "msg": "invalid api key"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_current_member().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    assert_eq!(err.message, "invalid api key");
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/members/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_profile("alice").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn curation_page_sends_paging_and_reads_last_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/curations/members/alice"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-4",
            "msg": "ok",
            "data": {
                "content": [
                    {"curationId": 11, "title": "one", "urls": [{"url": "https://a.example"}]},
                    {"curationId": 12, "title": "two"}
                ],
                "last": true,
                "number": 1
            }
        })))
        .mount(&server)
        .await;

    let page = api_for(&server)
        .fetch_curation_page("alice", 2, 10)
        .await
        .expect("page");
    assert_eq!(page.number, 2);
    assert!(page.is_last);
    let ids: Vec<_> = page.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![11, 12]);
}

#[tokio::test]
async fn page_without_last_flag_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/curations/members/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-4",
            "data": {"content": []}
        })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_curation_page("alice", 1, 10)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn link_preview_posts_url_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/link/preview"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(json!({"url": "https://a.example"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-4",
            "data": {
                "url": "https://a.example",
                "title": "A",
                "description": "about a",
                "image": "https://a.example/thumb.png"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        api_key: Some("secret".to_string()),
        ..ApiSettings::default()
    };
    let api = ReqwestCurationApi::new(settings).expect("client");
    let preview = api
        .fetch_link_preview("https://a.example")
        .await
        .expect("preview");
    assert_eq!(preview.title.as_deref(), Some("A"));
    assert_eq!(
        preview.thumbnail_url.as_deref(),
        Some("https://a.example/thumb.png")
    );
}

#[tokio::test]
async fn configured_success_codes_replace_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/members/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200-1",
            "data": {"username": "alice"}
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_profile("alice").await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Application { .. }));

    let settings = ApiSettings {
        base_url: server.uri(),
        success_codes: vec!["200-1".to_string()],
        ..ApiSettings::default()
    };
    let api = ReqwestCurationApi::new(settings).expect("client");
    assert_eq!(api.fetch_profile("alice").await.unwrap().username, "alice");
}

#[tokio::test]
async fn slow_response_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/members/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"code": "200-4", "data": {"username": "slow"}})),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    };
    let api = ReqwestCurationApi::new(settings).expect("client");
    let err = api.fetch_profile("slow").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Transport);
}

#[tokio::test]
async fn invalid_base_url_is_reported_without_a_request() {
    let settings = ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    };
    let api = ReqwestCurationApi::new(settings).expect("client");
    let err = api.fetch_profile("alice").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Transport);
    assert!(err.message.contains("invalid base url"));
}
