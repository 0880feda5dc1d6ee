//! API integration tests
//! Tests complete HTTP request/response cycles with real database

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use common::{bearer, fixtures, test_app, DownPublisher, RecordingPublisher, TestDb};
use openmusic_core::UserId;
use openmusic_export::{AmqpPublisher, QueueTopology};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

fn request(method: &str, uri: &str, user: Option<&UserId>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, bearer(user));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

async fn create_playlist(app: &Router, owner: &UserId, name: &str) -> String {
    let response = send(app, request("POST", "/api/playlists", Some(owner), Some(json!({ "name": name })))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await["playlistId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public_and_reports_cache() {
    let db = TestDb::new().await;
    let (app, _) = test_app(db.pool(), Arc::new(RecordingPublisher::default()));

    let response = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"], "local-only");
    assert!(body["export"].is_null());
}

#[tokio::test]
async fn test_health_reports_export_link_state() {
    let db = TestDb::new().await;
    let publisher = AmqpPublisher::new(
        "amqp://127.0.0.1:1/%2f",
        QueueTopology::default(),
        Duration::from_millis(500),
    );
    let (app, _) = test_app(db.pool(), Arc::new(publisher));

    let body = json_body(send(&app, request("GET", "/api/health", None, None)).await).await;
    assert_eq!(body["export"], "disconnected");
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let db = TestDb::new().await;
    let (app, _) = test_app(db.pool(), Arc::new(RecordingPublisher::default()));

    let response = send(&app, request("GET", "/api/playlists", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bad = Request::builder()
        .uri("/api/playlists")
        .header(header::AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, bad).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn test_playlist_song_flow() {
    let db = TestDb::new().await;
    let (app, _) = test_app(db.pool(), Arc::new(RecordingPublisher::default()));
    let owner = fixtures::create_user(db.pool(), "owner").await;
    let song = fixtures::create_song(db.pool(), "Highway").await;

    let playlist_id = create_playlist(&app, &owner, "Road Trip").await;
    let songs_uri = format!("/api/playlists/{}/songs", playlist_id);

    let add = || request("POST", &songs_uri, Some(&owner), Some(json!({ "songId": song })));
    assert_eq!(send(&app, add()).await.status(), StatusCode::CREATED);
    assert_eq!(send(&app, add()).await.status(), StatusCode::CONFLICT);

    let response = send(&app, request("GET", &songs_uri, Some(&owner), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Road Trip");
    assert_eq!(body["username"], "owner");
    assert_eq!(body["songs"].as_array().unwrap().len(), 1);
    assert_eq!(body["songs"][0]["title"], "Highway");

    let response = send(
        &app,
        request("DELETE", &songs_uri, Some(&owner), Some(json!({ "songId": song }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        request("GET", &format!("/api/playlists/{}/activities", playlist_id), Some(&owner), None),
    )
    .await;
    let body = json_body(response).await;
    assert_eq!(body["playlistId"], playlist_id.as_str());
    let actions: Vec<_> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(actions, ["add", "delete"]);
}

#[tokio::test]
async fn test_empty_playlist_name_is_bad_request() {
    let db = TestDb::new().await;
    let (app, _) = test_app(db.pool(), Arc::new(RecordingPublisher::default()));
    let owner = fixtures::create_user(db.pool(), "owner").await;

    let response = send(&app, request("POST", "/api/playlists", Some(&owner), Some(json!({ "name": "" })))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_collaboration_roles_over_http() {
    let db = TestDb::new().await;
    let (app, _) = test_app(db.pool(), Arc::new(RecordingPublisher::default()));
    let u1 = fixtures::create_user(db.pool(), "u1").await;
    let u2 = fixtures::create_user(db.pool(), "u2").await;
    let s1 = fixtures::create_song(db.pool(), "Song One").await;

    let p1 = create_playlist(&app, &u1, "p1").await;
    let grant = json!({ "playlistId": p1, "userId": u2 });

    // Collaborator cannot manage collaborators, owner can
    let response = send(&app, request("POST", "/api/collaborations", Some(&u2), Some(grant.clone()))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = send(&app, request("POST", "/api/collaborations", Some(&u1), Some(grant.clone()))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(json_body(response).await["collaborationId"].is_string());

    let response = send(
        &app,
        request("POST", &format!("/api/playlists/{}/songs", p1), Some(&u2), Some(json!({ "songId": s1 }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Shared playlist shows up for the collaborator
    let response = send(&app, request("GET", "/api/playlists", Some(&u2), None)).await;
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["username"], "u1");

    let delete_uri = format!("/api/playlists/{}", p1);
    assert_eq!(
        send(&app, request("DELETE", &delete_uri, Some(&u2), None)).await.status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        send(&app, request("DELETE", &delete_uri, Some(&u1), None)).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        send(&app, request("GET", &format!("/api/playlists/{}/songs", p1), Some(&u1), None))
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_likes_report_data_source_header() {
    let db = TestDb::new().await;
    let (app, _) = test_app(db.pool(), Arc::new(RecordingPublisher::default()));
    let user = fixtures::create_user(db.pool(), "listener").await;
    let album = fixtures::create_album(db.pool(), "Debut").await;
    let uri = format!("/api/albums/{}/likes", album);

    let response = send(&app, request("GET", &uri, Some(&user), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-data-source"], "database");
    assert_eq!(json_body(response).await["likes"], 0);

    let response = send(&app, request("GET", &uri, Some(&user), None)).await;
    assert_eq!(response.headers()["x-data-source"], "cache");

    assert_eq!(
        send(&app, request("POST", &uri, Some(&user), None)).await.status(),
        StatusCode::CREATED
    );
    assert_eq!(
        send(&app, request("POST", &uri, Some(&user), None)).await.status(),
        StatusCode::CONFLICT
    );

    let response = send(&app, request("GET", &uri, Some(&user), None)).await;
    assert_eq!(response.headers()["x-data-source"], "database");
    assert_eq!(json_body(response).await["likes"], 1);

    let response = send(&app, request("GET", "/api/albums/album-missing/likes", Some(&user), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_is_accepted_and_queued() {
    let db = TestDb::new().await;
    let publisher = Arc::new(RecordingPublisher::default());
    let (app, _) = test_app(db.pool(), publisher.clone());
    let owner = fixtures::create_user(db.pool(), "owner").await;
    let stranger = fixtures::create_user(db.pool(), "stranger").await;
    let playlist_id = create_playlist(&app, &owner, "Road Trip").await;
    let uri = format!("/api/export/playlists/{}", playlist_id);

    let body = json!({ "targetEmail": "friend@example.com" });
    let response = send(&app, request("POST", &uri, Some(&stranger), Some(body.clone()))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(publisher.published().is_empty());

    let response = send(&app, request("POST", &uri, Some(&owner), Some(body))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(publisher.published().len(), 1);

    let response = send(
        &app,
        request("POST", &uri, Some(&owner), Some(json!({ "targetEmail": "nope" }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(publisher.published().len(), 1);
}

#[tokio::test]
async fn test_export_with_broker_down_is_service_unavailable() {
    let db = TestDb::new().await;
    let (app, _) = test_app(db.pool(), Arc::new(DownPublisher));
    let owner = fixtures::create_user(db.pool(), "owner").await;
    let playlist_id = create_playlist(&app, &owner, "Road Trip").await;

    let response = send(
        &app,
        request("POST", &format!("/api/export/playlists/{}", playlist_id), Some(&owner), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
