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
    campaign::{CreateCampaign, UpdateCampaign},
  },
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/", get(list).post(create))
    .route("/{id}", get(by_id).put(update).delete(delete))
}

fn validate(req: &CreateCampaign) -> Result<()> {
  let mut issues = vec![];

  if req.name.trim().len() < 3 {
    issues.push(Issue::new("name", "Name must be at least 3 characters"));
  }
  if req.product_name.trim().is_empty() {
    issues.push(Issue::new("productName", "Product name is required"));
  }
  if req.sku_array.is_empty()
    || req.sku_array.iter().any(|sku| sku.trim().is_empty())
  {
    issues.push(Issue::new("skuArray", "At least one non-empty SKU is required"));
  }
  if !req.link_sample.starts_with("http") {
    issues.push(Issue::new("linkSample", "Sample link must be a valid URL"));
  }
  if req.product_qty < 1 {
    issues.push(Issue::new("productQty", "Product quantity must be at least 1"));
  }
  if req.brief.trim().len() < 10 {
    issues.push(Issue::new("brief", "Brief must be at least 10 characters"));
  }
  if req.video_qty < 1 {
    issues.push(Issue::new("videoQty", "Video quantity must be at least 1"));
  }
  if req.join_message.trim().is_empty() {
    issues.push(Issue::new("joinMessage", "Join message is required"));
  }
  if req.end_date <= req.start_date {
    issues.push(Issue::new("endDate", "End date must be after start date"));
  }

  ensure(issues)
}

async fn list(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
) -> Result<Json<json::Value>> {
  let campaigns = sv::Campaign::new(&state.db).all(&user.id).await?;
  Ok(ok(campaigns))
}

async fn create(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<CreateCampaign>,
) -> Result<Json<json::Value>> {
  validate(&req)?;

  let campaign = sv::Campaign::new(&state.db).create(&user.id, req).await?;
  Ok(ok(campaign))
}

async fn by_id(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  let campaign = sv::Campaign::new(&state.db).by_id(&user.id, &id).await?;
  Ok(ok(campaign))
}

async fn update(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
  Json(patch): Json<UpdateCampaign>,
) -> Result<Json<json::Value>> {
  let mut issues = vec![];
  if let Some(skus) = &patch.sku_array
    && (skus.is_empty() || skus.iter().any(|sku| sku.trim().is_empty()))
  {
    issues.push(Issue::new("skuArray", "At least one non-empty SKU is required"));
  }
  if let Some(link) = &patch.link_sample
    && !link.starts_with("http")
  {
    issues.push(Issue::new("linkSample", "Sample link must be a valid URL"));
  }
  ensure(issues)?;

  let campaign =
    sv::Campaign::new(&state.db).update(&user.id, &id, patch).await?;
  Ok(ok(campaign))
}

async fn delete(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  sv::Campaign::new(&state.db).delete(&user.id, &id).await?;
  Ok(ok_message("Campaign deleted"))
}
