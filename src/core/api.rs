//! HTTP + WebSocket API for squat sessions
//!
//! Endpoints:
//! - GET  /health - Health check
//! - POST /session/new - Create session
//! - GET  /session/:id - Session status
//! - POST /session/:id/frame - Feed one pose frame
//! - POST /session/:id/sample - Feed one scalar sample
//! - POST /session/:id/end - Finish session, store summary
//! - GET  /sessions - Stored session history
//! - WS   /ws/:id - Send frames, receive results (and results from HTTP)

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::core::coach::Coach;
use crate::core::feedback::TracingSink;
use crate::core::history::SessionStore;
use crate::types::{
    FrameInput, FrameOutput, ObserveOutput, Phase, Sample, SessionRecord, SignalStrategyKind,
    Thresholds,
};

/// Live session
#[derive(Debug)]
pub struct Session {
    pub coach: Coach<TracingSink>,
    pub update_tx: broadcast::Sender<FrameOutput>,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, Session>>,
    pub history: Mutex<SessionStore>,
    pub config: Config,
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    pub strategy: Option<SignalStrategyKind>,
    pub thresholds: Option<Thresholds>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
    pub strategy: SignalStrategyKind,
    pub thresholds: Thresholds,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub phase: Phase,
    pub reps: u32,
    pub strategy: SignalStrategyKind,
    pub thresholds: Thresholds,
    pub frames_observed: u64,
    pub frames_missing: u64,
    pub elapsed_secs: f64,
}

/// Scalar sample request
#[derive(Debug, Deserialize)]
pub struct SampleRequest {
    pub signal: Option<f64>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Error pushed over the socket when a message can't be used
#[derive(Debug, Serialize)]
struct WsError {
    detected: bool,
    reps: u32,
    feedback: String,
    error: String,
}

/// Create the API router
pub fn create_router(config: Config, history: SessionStore) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        history: Mutex::new(history),
        config,
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/frame", post(add_frame))
        .route("/session/:id/sample", post(add_sample))
        .route("/session/:id/end", post(end_session))
        .route("/sessions", get(list_sessions))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    body: Option<Json<NewSessionRequest>>,
) -> Result<Json<NewSessionResponse>, StatusCode> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let strategy = req.strategy.unwrap_or(state.config.strategy);
    // config-level thresholds only make sense for the configured strategy
    let thresholds = req.thresholds.or_else(|| {
        (strategy == state.config.strategy)
            .then_some(state.config.thresholds)
            .flatten()
    });

    let coach = Coach::new(strategy, thresholds, state.config.posture_limits(), TracingSink)
        .map_err(|e| {
            warn!(error = %e, "rejected session thresholds");
            StatusCode::BAD_REQUEST
        })?;
    let session_id = coach.id().to_string();
    let thresholds = coach.counter().thresholds();
    let (tx, _) = broadcast::channel(100);

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), Session { coach, update_tx: tx });

    Ok(Json(NewSessionResponse {
        websocket_url: format!("/ws/{}", session_id),
        session_id,
        strategy,
        thresholds,
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let counter = session.coach.counter();

    Ok(Json(SessionStatusResponse {
        session_id: id,
        phase: counter.phase(),
        reps: counter.rep_count(),
        strategy: session.coach.strategy(),
        thresholds: counter.thresholds(),
        frames_observed: counter.samples_observed(),
        frames_missing: counter.samples_missing(),
        elapsed_secs: session.coach.elapsed_secs(),
    }))
}

/// Feed one pose frame
async fn add_frame(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(input): Json<FrameInput>,
) -> Result<Json<FrameOutput>, StatusCode> {
    let output = process_frame(&state, &id, input).await?;
    Ok(Json(output))
}

/// Feed one scalar sample
async fn add_sample(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SampleRequest>,
) -> Result<Json<ObserveOutput>, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let output = session.coach.observe_signal(Sample::from(req.signal));
    Ok(Json(output))
}

/// Finish a session and store its summary
async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionRecord>, StatusCode> {
    let session = {
        let mut sessions = state.sessions.write().await;
        sessions.remove(&id).ok_or(StatusCode::NOT_FOUND)?
    };
    let record = session.coach.finish();

    let mut history = state.history.lock().await;
    history.append(record.clone()).map_err(|e| {
        error!(error = %e, session = %id, "failed to store session");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(record))
}

/// Stored history
async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<SessionRecord>> {
    let history = state.history.lock().await;
    Json(history.records().to_vec())
}

/// Run one frame through a session and broadcast the result
async fn process_frame(state: &AppState, id: &str, input: FrameInput) -> Result<FrameOutput, StatusCode> {
    let frame = input.into_frame(state.config.min_visibility);
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(id).ok_or(StatusCode::NOT_FOUND)?;

    let output = session.coach.process(&frame);
    // no subscribers is fine
    let _ = session.update_tx.send(output.clone());
    Ok(output)
}

/// WebSocket handler
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = session.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, state, id, rx).await;
    }))
}

/// Inbound: frames to process. Outbound: every result for this session.
async fn handle_websocket(
    socket: WebSocket,
    state: Arc<AppState>,
    id: String,
    mut rx: broadcast::Receiver<FrameOutput>,
) {
    let (mut sender, mut receiver) = socket.split();
    let (err_tx, mut err_rx) = tokio::sync::mpsc::channel::<String>(16);
    info!(session = %id, "websocket connected");

    let mut send_task = tokio::spawn(async move {
        loop {
            let json = tokio::select! {
                update = rx.recv() => match update {
                    Ok(update) => serde_json::to_string(&update).unwrap_or_default(),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "websocket subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                Some(err) = err_rx.recv() => err,
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let recv_id = id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };
            let reply = match serde_json::from_str::<FrameInput>(&text) {
                Ok(input) => match process_frame(&recv_state, &recv_id, input).await {
                    Ok(_) => None,
                    Err(_) => Some(ws_error(&recv_state, &recv_id, "session ended").await),
                },
                Err(e) => {
                    debug!(error = %e, "bad websocket frame");
                    Some(ws_error(&recv_state, &recv_id, &format!("invalid frame: {}", e)).await)
                }
            };
            if let Some(reply) = reply {
                if err_tx.send(reply).await.is_err() {
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    info!(session = %id, "websocket closed");
}

async fn ws_error(state: &AppState, id: &str, message: &str) -> String {
    let reps = state
        .sessions
        .read()
        .await
        .get(id)
        .map(|s| s.coach.reps())
        .unwrap_or(0);
    let err = WsError {
        detected: false,
        reps,
        feedback: String::new(),
        error: message.to_string(),
    };
    serde_json::to_string(&err).unwrap_or_default()
}

/// Run the API server
pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let history = SessionStore::load(&config.history.path)?;
    let addr = config.server.addr.clone();
    let router = create_router(config, history);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "GymBuddy API running");
    println!("  POST /session/new         - Create session");
    println!("  GET  /session/:id         - Get status");
    println!("  POST /session/:id/frame   - Feed pose frame");
    println!("  POST /session/:id/sample  - Feed scalar sample");
    println!("  POST /session/:id/end     - Finish session");
    println!("  GET  /sessions            - Session history");
    println!("  WS   /ws/:id              - Live frames");
    println!("  GET  /health              - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
