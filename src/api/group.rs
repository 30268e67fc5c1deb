use axum::{
  Json, Router,
  extract::{Path, State},
  routing::get,
};

use crate::{
  api::{AuthUser, ensure, ok, ok_message},
  prelude::*,
  state::AppState,
  sv::{
    self,
    group::{CreateGroup, UpdateGroup},
  },
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/", get(list).post(create))
    .route("/{id}", get(by_id).put(update).delete(delete))
}

async fn list(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
) -> Result<Json<json::Value>> {
  let groups = sv::Group::new(&state.db).all(&user.id).await?;
  Ok(ok(groups))
}

async fn create(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<CreateGroup>,
) -> Result<Json<json::Value>> {
  let mut issues = vec![];
  if req.name.trim().is_empty() {
    issues.push(Issue::new("name", "Name is required"));
  }
  ensure(issues)?;

  let group = sv::Group::new(&state.db).create(&user.id, req).await?;
  Ok(ok(group))
}

async fn by_id(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  let group = sv::Group::new(&state.db).by_id(&user.id, &id).await?;
  Ok(ok(group))
}

async fn update(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
  Json(patch): Json<UpdateGroup>,
) -> Result<Json<json::Value>> {
  let group = sv::Group::new(&state.db).update(&user.id, &id, patch).await?;
  Ok(ok(group))
}

async fn delete(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  sv::Group::new(&state.db).delete(&user.id, &id).await?;
  Ok(ok_message("Group deleted"))
}
