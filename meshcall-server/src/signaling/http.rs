use crate::SignalingService;
use super::ws_handler::ws_handler;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use meshcall_core::RoomId;
use meshcall_core::utils::SIGNALING_PATH;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub rooms: Vec<RoomId>,
}

/// HTTP surface of the relay: the signaling socket plus a polling endpoint
/// for room browsers.
pub fn router(service: SignalingService, cors: CorsLayer) -> Router {
    Router::new()
        .route(SIGNALING_PATH, get(ws_handler))
        .route("/rooms", get(rooms_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .with_state(service)
}

async fn rooms_handler(State(service): State<SignalingService>) -> Response {
    match service.relay.list_rooms().await {
        Ok(rooms) => Json(RoomsResponse { rooms }).into_response(),
        Err(e) => {
            error!("Failed to list rooms: {}", e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}
