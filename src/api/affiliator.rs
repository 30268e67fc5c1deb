use axum::{
  Json, Router,
  extract::{Path, Query, State},
  routing::{get, post},
};
use serde::Deserialize;

use crate::{
  api::{AuthUser, ensure, ok, ok_message, validate_phone},
  prelude::*,
  state::AppState,
  sv::{
    self,
    affiliator::{CreateAffiliator, UpdateAffiliator},
  },
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/", get(list).post(create))
    .route("/import", post(import))
    .route("/{id}", get(by_id).put(update).delete(delete))
}

fn validate(req: &CreateAffiliator, field_prefix: &str) -> Vec<Issue> {
  let mut issues = vec![];

  if req.tiktok_username.trim().is_empty() {
    issues.push(Issue::new(
      format!("{field_prefix}tiktokUsername"),
      "TikTok username is required",
    ));
  }
  if req.name.trim().is_empty() {
    issues.push(Issue::new(format!("{field_prefix}name"), "Name is required"));
  }
  validate_phone(
    &mut issues,
    &format!("{field_prefix}phoneNumber"),
    &req.phone_number,
  );

  issues
}

#[derive(Deserialize)]
struct ListQuery {
  search: Option<String>,
}

#[derive(Deserialize)]
struct Import {
  affiliators: Vec<CreateAffiliator>,
}

async fn list(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Query(query): Query<ListQuery>,
) -> Result<Json<json::Value>> {
  let affiliators = sv::Affiliator::new(&state.db)
    .all(&user.id, query.search.as_deref())
    .await?;
  Ok(ok(affiliators))
}

async fn create(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<CreateAffiliator>,
) -> Result<Json<json::Value>> {
  ensure(validate(&req, ""))?;

  let affiliator = sv::Affiliator::new(&state.db).create(&user.id, req).await?;
  Ok(ok(affiliator))
}

async fn import(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<Import>,
) -> Result<Json<json::Value>> {
  if req.affiliators.is_empty() {
    return Err(Error::InvalidArgs("No affiliators to import".into()));
  }

  let mut issues = vec![];
  for (index, item) in req.affiliators.iter().enumerate() {
    issues.extend(validate(item, &format!("affiliators[{index}].")));
  }
  ensure(issues)?;

  let report = sv::Affiliator::new(&state.db)
    .bulk_import(&user.id, req.affiliators)
    .await?;
  Ok(ok(report))
}

async fn by_id(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  let affiliator = sv::Affiliator::new(&state.db).by_id(&user.id, &id).await?;
  Ok(ok(affiliator))
}

async fn update(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
  Json(patch): Json<UpdateAffiliator>,
) -> Result<Json<json::Value>> {
  let mut issues = vec![];
  if let Some(phone) = &patch.phone_number {
    validate_phone(&mut issues, "phoneNumber", phone);
  }
  ensure(issues)?;

  let affiliator =
    sv::Affiliator::new(&state.db).update(&user.id, &id, patch).await?;
  Ok(ok(affiliator))
}

async fn delete(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  sv::Affiliator::new(&state.db).delete(&user.id, &id).await?;
  Ok(ok_message("Affiliator deleted"))
}
