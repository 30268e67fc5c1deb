use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use serde::Deserialize;

use crate::{
  api::{ExtensionUser, ok},
  entity::SubscriptionStatus,
  prelude::*,
  state::AppState,
  sv::{self, auth, sample::SyncItem},
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/verify-license", post(verify_license))
    .route("/sync-samples", post(sync_samples))
    .route("/existing-ids", get(existing_ids))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyLicense {
  license_key: String,
}

/// Exchanges a license key for a bearer token. The only unauthenticated
/// extension endpoint.
async fn verify_license(
  State(state): State<Arc<AppState>>,
  Json(req): Json<VerifyLicense>,
) -> Result<Json<json::Value>> {
  let user =
    sv::User::new(&state.db).by_license_key(&req.license_key).await?;

  let expired = user
    .subscription_expiry
    .is_some_and(|expiry| expiry < Utc::now().naive_utc());
  if user.subscription_status != SubscriptionStatus::Active || expired {
    return Err(Error::InvalidArgs(
      "Subscription is expired or inactive".into(),
    ));
  }

  let token = auth::issue_extension_token(&user, &state.config.server_secret)?;

  Ok(ok(json::json!({
    "token": token,
    "user": {
      "name": user.name,
      "email": user.email,
      "tier": user.tier,
    },
  })))
}

#[derive(Deserialize)]
struct SyncRequest {
  samples: Vec<SyncItem>,
}

async fn sync_samples(
  State(state): State<Arc<AppState>>,
  ExtensionUser(user): ExtensionUser,
  Json(req): Json<SyncRequest>,
) -> Result<Json<json::Value>> {
  let report = sv::Sample::new(&state.db).sync(&user.id, req.samples).await?;
  Ok(ok(report))
}

async fn existing_ids(
  State(state): State<Arc<AppState>>,
  ExtensionUser(user): ExtensionUser,
) -> Result<Json<json::Value>> {
  let ids = sv::Sample::new(&state.db).existing_ids(&user.id).await?;
  Ok(ok(json::json!({ "requestIds": ids })))
}
