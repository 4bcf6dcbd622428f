//! Axum web server with WebSocket streaming for the globe frontend.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use healthgrid_graph::{Connection, DomainGraph, Entity};
use healthgrid_reveal::{RevealDriver, RevealEngine, RevealError, RevealMode, SessionSnapshot};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::frame::Frame;

/// Shared application state.
pub struct AppState {
    graph: Arc<DomainGraph>,
    mode: RevealMode,
    driver: RevealDriver,
}

impl AppState {
    async fn frame(&self) -> Frame {
        self.driver.with_view(Frame::build).await
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server around an idle engine.
    pub fn new(engine: RevealEngine) -> Self {
        let graph = Arc::clone(engine.graph());
        let mode = engine.mode();
        Self {
            state: Arc::new(AppState {
                graph,
                mode,
                driver: RevealDriver::new(engine),
            }),
        }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/graph", get(graph_handler))
            .route("/api/session", get(session_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/select", post(select_handler))
            .route("/api/close", post(close_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given address.
    pub async fn serve(self, addr: SocketAddr) -> crate::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Health grid server running on http://{}", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Server status response.
#[derive(Debug, Serialize, Deserialize)]
struct StatusResponse {
    status: String,
    entity_count: usize,
    connection_count: usize,
    mode: RevealMode,
}

#[derive(Debug, Serialize, Deserialize)]
struct GraphResponse {
    entities: Vec<Entity>,
    connections: Vec<Connection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Rejected selection.
struct ApiError(RevealError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            RevealError::UnknownEntity(_) => StatusCode::NOT_FOUND,
            RevealError::UnknownMode(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        entity_count: state.graph.entities().len(),
        connection_count: state.graph.connections().len(),
        mode: state.mode,
    })
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> Json<GraphResponse> {
    Json(GraphResponse {
        entities: state.graph.entities().to_vec(),
        connections: state.graph.connections().to_vec(),
    })
}

async fn session_handler(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.driver.snapshot().await)
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    Json(state.frame().await)
}

#[derive(Debug, Deserialize)]
struct SelectRequest {
    id: String,
}

async fn select_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state.driver.select(&req.id).await.map(Json).map_err(ApiError)
}

async fn close_handler(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.driver.close().await)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut revisions = state.driver.subscribe();

    // Send initial frame
    let frame = state.frame().await;
    revisions.borrow_and_update();
    if send(&mut socket, &WsResponse::Frame(frame)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_ws_text(&state, &text).await;
                        if send(&mut socket, &response).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                revisions.borrow_and_update();
                let frame = state.frame().await;
                debug!(session = ?frame.session.session_id, cursor = frame.session.cursor, "pushing frame");
                if send(&mut socket, &WsResponse::Frame(frame)).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn send(socket: &mut WebSocket, response: &WsResponse) -> Result<(), ()> {
    let json = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to encode ws response: {}", e);
            return Err(());
        }
    };
    socket.send(Message::Text(json.into())).await.map_err(|e| {
        warn!("Failed to send ws message: {}", e);
    })
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum WsCommand {
    #[serde(rename = "select")]
    Select { id: String },
    #[serde(rename = "close")]
    Close,
    #[serde(rename = "get_frame")]
    GetFrame,
    #[serde(rename = "get_session")]
    GetSession,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum WsResponse {
    #[serde(rename = "frame")]
    Frame(Frame),
    #[serde(rename = "session")]
    Session(SessionSnapshot),
    #[serde(rename = "error")]
    Error { message: String },
}

async fn handle_ws_text(state: &Arc<AppState>, text: &str) -> WsResponse {
    match serde_json::from_str::<WsCommand>(text) {
        Ok(cmd) => handle_ws_command(state, cmd).await,
        Err(e) => WsResponse::Error { message: format!("bad command: {e}") },
    }
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    match cmd {
        WsCommand::Select { id } => match state.driver.select(&id).await {
            Ok(snapshot) => WsResponse::Session(snapshot),
            Err(e) => WsResponse::Error { message: e.to_string() },
        },
        WsCommand::Close => WsResponse::Session(state.driver.close().await),
        WsCommand::GetFrame => WsResponse::Frame(state.frame().await),
        WsCommand::GetSession => WsResponse::Session(state.driver.snapshot().await),
    }
}
