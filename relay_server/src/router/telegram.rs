use axum::{extract::State, response::Json, routing::post, Router};
use serde_json::{json, Value};

use crate::{error::Result, payload::SendMessageRequest, state::AppState};

pub fn telegram_router() -> Router<AppState> {
    Router::new().route("/telegram/send", post(send_message))
}

async fn send_message(State(app_state): State<AppState>, Json(request): Json<SendMessageRequest>) -> Result<Json<Value>> {
    let telegram = app_state
        .telegram
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Telegram bot is not configured"))?;
    telegram
        .send_message(&request.chat_id, &request.message, request.parse_mode)
        .await?;
    Ok(Json(json!({ "success": true })))
}
