/// Liveness endpoint
///
/// ```text
/// GET /api/ping  ->  200 {"message": "pong"}
/// ```
///
/// Does not touch the store, so it stays green while the database is down.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Ping response
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong".to_string(),
    })
}
