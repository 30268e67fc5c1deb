use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{delete, get},
};

use crate::{
  api::{AuthUser, ok_message},
  prelude::*,
  state::AppState,
  sv::{self, sample::SampleQuery},
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new().route("/", get(list)).route("/{id}", delete(remove))
}

async fn list(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Query(query): Query<SampleQuery>,
) -> Result<Json<json::Value>> {
  let (samples, meta) = sv::Sample::new(&state.db).list(&user.id, query).await?;

  Ok(Json(json::json!({
    "success": true,
    "data": samples,
    "meta": meta,
  })))
}

async fn remove(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  sv::Sample::new(&state.db).delete(&user.id, &id).await?;
  Ok(ok_message("Sample request deleted"))
}
