use axum::{
  Json, Router,
  extract::{Query, State},
  routing::{get, post},
};
use serde::Deserialize;

use crate::{
  api::{AuthUser, ok, ok_message},
  prelude::*,
  state::AppState,
  sv::{
    self, Gemini,
    broadcast::{GenerateMessage, SendBroadcast},
  },
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/generate-message", post(generate_message))
    .route("/send", post(send))
    .route("/status", get(status))
    .route("/history", get(history))
}

async fn generate_message(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<GenerateMessage>,
) -> Result<Json<json::Value>> {
  let gemini = Gemini::from_config(&state.http, &state.config)?;
  let message =
    sv::Broadcast::new(&state.db).generate(&gemini, &user.id, req).await?;

  Ok(ok(json::json!({ "message": message })))
}

async fn send(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<SendBroadcast>,
) -> Result<Json<json::Value>> {
  sv::Broadcast::new(&state.db)
    .send(
      &state.http,
      state.config.broadcast_webhook_url.as_deref(),
      &user,
      req,
    )
    .await?;

  Ok(ok_message("Broadcast queued"))
}

async fn status(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
) -> Result<Json<json::Value>> {
  let message = sv::Broadcast::new(&state.db).status(&user.id).await?;
  Ok(ok(message))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryQuery {
  campaign_id: Option<String>,
  affiliator_id: Option<String>,
}

async fn history(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Query(query): Query<HistoryQuery>,
) -> Result<Json<json::Value>> {
  let logs = sv::Broadcast::new(&state.db)
    .logs(
      &user.id,
      query.campaign_id.as_deref(),
      query.affiliator_id.as_deref(),
    )
    .await?;

  Ok(ok(logs))
}
