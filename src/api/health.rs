use axum::response::Json;
use serde_json::{Value, json};

/// Liveness probe for the local callback server.
///
/// The auth flow only needs this to confirm the server came up before the
/// browser redirect lands on `/callback`.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
