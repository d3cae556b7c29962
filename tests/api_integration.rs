//! Integration tests for the HTTP API
//!
//! Router clones share state, so a whole session can be driven with oneshot.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use gymbuddy::config::Config;
use gymbuddy::core::{create_router, SessionStore};
use serde_json::{json, Value};
use std::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tower::ServiceExt;

fn test_router(name: &str) -> (Router, std::path::PathBuf) {
    let dir = std::env::temp_dir().join(format!("gymbuddy_api_{}_{}", name, std::process::id()));
    let path = dir.join("sessions.json");
    let _ = std::fs::remove_dir_all(&dir);
    let mut config = Config::default();
    config.history.path = path.display().to_string();
    let store = SessionStore::load(&path).unwrap();
    (create_router(config, store), dir)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn frame(hip_y: f64) -> Value {
    json!({
        "left_shoulder": {"x": 0.5, "y": 0.2},
        "left_hip": {"x": 0.5, "y": hip_y},
        "left_knee": {"x": 0.55, "y": 0.7},
        "left_ankle": {"x": 0.55, "y": 0.9}
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, dir) = test_router("health");
    let (status, json) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["sessions_active"], 0);
    assert!(json["version"].is_string());
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_create_session_defaults() {
    let (app, dir) = test_router("create");
    let (status, json) = call(&app, "POST", "/session/new", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["session_id"].is_string());
    assert_eq!(json["strategy"], "vertical-displacement");
    assert_eq!(json["thresholds"]["down_enter"], 0.1);

    let (_, health) = call(&app, "GET", "/health", None).await;
    assert_eq!(health["sessions_active"], 1);
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_create_session_rejects_collapsed_band() {
    let (app, dir) = test_router("reject");
    let body = json!({"thresholds": {"down_enter": 0.1, "up_enter": 0.1}});
    let (status, _) = call(&app, "POST", "/session/new", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (app, dir) = test_router("missing");
    let (status, _) = call(&app, "GET", "/session/nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", "/session/nonexistent/frame", Some(frame(0.5))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app, "POST", "/session/nonexistent/end", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_full_session_flow() {
    let (app, dir) = test_router("flow");

    let (_, created) = call(&app, "POST", "/session/new", Some(json!({}))).await;
    let id = created["session_id"].as_str().unwrap().to_string();

    let (status, down) = call(&app, "POST", &format!("/session/{}/frame", id), Some(frame(0.85))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(down["detected"], true);
    assert_eq!(down["phase"], "DOWN");
    assert!(down["feedback"].as_str().unwrap().contains("Good depth"));

    let (_, up) = call(&app, "POST", &format!("/session/{}/frame", id), Some(frame(0.5))).await;
    assert_eq!(up["reps"], 1);
    assert!(up["feedback"].as_str().unwrap().contains("Rep 1"));

    // frame with nothing usable
    let (_, empty) = call(&app, "POST", &format!("/session/{}/frame", id), Some(json!({}))).await;
    assert_eq!(empty["detected"], false);
    assert_eq!(empty["reps"], 1);

    // scalar samples go through the same counter
    call(&app, "POST", &format!("/session/{}/sample", id), Some(json!({"signal": 0.3}))).await;
    let (_, sample) = call(&app, "POST", &format!("/session/{}/sample", id), Some(json!({"signal": 0.0}))).await;
    assert_eq!(sample["rep_count"], 2);
    assert_eq!(sample["event"]["kind"], "rep_completed");

    let (_, status_json) = call(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(status_json["reps"], 2);
    assert_eq!(status_json["frames_observed"], 5);
    assert_eq!(status_json["frames_missing"], 1);

    let (status, record) = call(&app, "POST", &format!("/session/{}/end", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["reps"], 2);

    let (status, _) = call(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, history) = call(&app, "GET", "/sessions", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["id"], id.as_str());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_create_session_rejects_band_inverted_for_strategy() {
    let (app, dir) = test_router("inverted");
    let body = json!({"thresholds": {"down_enter": 0.05, "up_enter": 0.10}});
    let (status, _) = call(&app, "POST", "/session/new", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({"strategy": "knee-angle", "thresholds": {"down_enter": 0.10, "up_enter": 0.05}});
    let (status, _) = call(&app, "POST", "/session/new", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, health) = call(&app, "GET", "/health", None).await;
    assert_eq!(health["sessions_active"], 0);
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_knee_angle_session() {
    let (app, dir) = test_router("knee");
    let (_, created) = call(&app, "POST", "/session/new", Some(json!({"strategy": "knee-angle"}))).await;
    assert_eq!(created["thresholds"]["up_enter"], 160.0);
    let id = created["session_id"].as_str().unwrap().to_string();

    let bent = json!({
        "hip": {"x": 0.3, "y": 0.7},
        "knee": {"x": 0.5, "y": 0.7},
        "ankle": {"x": 0.5, "y": 0.9}
    });
    let straight = json!({
        "hip": {"x": 0.5, "y": 0.5},
        "knee": {"x": 0.5, "y": 0.7},
        "ankle": {"x": 0.5, "y": 0.9}
    });
    let (_, down) = call(&app, "POST", &format!("/session/{}/frame", id), Some(bent)).await;
    assert_eq!(down["event"]["kind"], "depth_reached");
    let (_, up) = call(&app, "POST", &format!("/session/{}/frame", id), Some(straight)).await;
    assert_eq!(up["reps"], 1);
    let _ = std::fs::remove_dir_all(dir);
}

/// Next text message from the socket as JSON
async fn next_json<S>(socket: &mut S) -> Value
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("no websocket message within 5s")
            .expect("websocket closed")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_websocket_frames_and_broadcast() {
    let (app, dir) = test_router("ws");
    let (_, created) = call(&app, "POST", "/session/new", None).await;
    let id = created["session_id"].as_str().unwrap().to_string();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = app.clone();
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, served).await;
    });

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws/{}", addr, id))
        .await
        .unwrap();

    // unusable message gets an error reply and the socket stays open
    socket.send(Message::Text("not a frame".to_string())).await.unwrap();
    let err = next_json(&mut socket).await;
    assert_eq!(err["detected"], false);
    assert_eq!(err["reps"], 0);
    assert!(err["error"].as_str().unwrap().starts_with("invalid frame"));

    socket.send(Message::Text(frame(0.85).to_string())).await.unwrap();
    let down = next_json(&mut socket).await;
    assert_eq!(down["detected"], true);
    assert_eq!(down["phase"], "DOWN");
    assert_eq!(down["event"]["kind"], "depth_reached");

    // HTTP frames reach websocket subscribers
    let (_, up) = call(&app, "POST", &format!("/session/{}/frame", id), Some(frame(0.5))).await;
    assert_eq!(up["reps"], 1);
    let pushed = next_json(&mut socket).await;
    assert_eq!(pushed["reps"], 1);
    assert_eq!(pushed["event"]["kind"], "rep_completed");

    // unknown session is refused before upgrade
    let refused = tokio_tungstenite::connect_async(format!("ws://{}/ws/nonexistent", addr)).await;
    assert!(refused.is_err());

    // ending the session closes the update channel and the socket with it
    let (status, _) = call(&app, "POST", &format!("/session/{}/end", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let closed = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("socket still open after session end");
    assert!(matches!(closed, None | Some(Ok(Message::Close(_))) | Some(Err(_))));
    server.abort();
    let _ = std::fs::remove_dir_all(dir);
}
