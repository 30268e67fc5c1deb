use axum::{
  Json, Router,
  extract::State,
  routing::{get, post, put},
};
use serde::Deserialize;

use crate::{
  api::{AuthUser, ensure, ok, ok_message, validate_phone},
  prelude::*,
  state::AppState,
  sv::{self, Whatsapp},
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/profile", get(profile).put(update_profile))
    .route("/password", put(change_password))
    .route("/subscription", get(subscription))
    .route(
      "/whatsapp/instance",
      post(create_instance).delete(delete_instance),
    )
    .route("/whatsapp/connect", get(connect_instance))
    .route("/whatsapp/status", get(instance_status))
}

async fn profile(AuthUser(user): AuthUser) -> Json<json::Value> {
  ok(user)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProfile {
  name: Option<String>,
  phone_number: Option<String>,
}

async fn update_profile(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<UpdateProfile>,
) -> Result<Json<json::Value>> {
  let mut issues = vec![];
  if let Some(name) = &req.name
    && name.trim().len() < 3
  {
    issues.push(Issue::new("name", "Name must be at least 3 characters"));
  }
  if let Some(phone) = &req.phone_number {
    validate_phone(&mut issues, "phoneNumber", phone);
  }
  ensure(issues)?;

  let user = sv::User::new(&state.db)
    .update_profile(&user.id, req.name, req.phone_number)
    .await?;
  Ok(ok(user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePassword {
  current_password: String,
  new_password: String,
}

async fn change_password(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<ChangePassword>,
) -> Result<Json<json::Value>> {
  if req.new_password.len() < 8 {
    return Err(Error::Validation(vec![Issue::new(
      "newPassword",
      "Password must be at least 8 characters",
    )]));
  }

  sv::User::new(&state.db)
    .change_password(&user, &req.current_password, &req.new_password)
    .await?;
  Ok(ok_message("Password updated"))
}

async fn subscription(AuthUser(user): AuthUser) -> Json<json::Value> {
  ok(sv::User::subscription_view(&user))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateInstance {
  phone_number: String,
}

/// Each tenant owns exactly one WhatsApp instance, named by their user id.
async fn create_instance(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
  Json(req): Json<CreateInstance>,
) -> Result<Json<json::Value>> {
  let mut issues = vec![];
  validate_phone(&mut issues, "phoneNumber", &req.phone_number);
  ensure(issues)?;

  let whatsapp = Whatsapp::from_config(&state.http, &state.config)?;
  let result = whatsapp.create_instance(&user.id, &req.phone_number).await?;
  Ok(ok(result))
}

async fn connect_instance(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
) -> Result<Json<json::Value>> {
  let whatsapp = Whatsapp::from_config(&state.http, &state.config)?;
  let result = whatsapp.connect_instance(&user.id).await?;
  Ok(ok(result))
}

async fn instance_status(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
) -> Result<Json<json::Value>> {
  let whatsapp = Whatsapp::from_config(&state.http, &state.config)?;
  let result = whatsapp.connection_state(&user.id).await?;
  Ok(ok(result))
}

async fn delete_instance(
  State(state): State<Arc<AppState>>,
  AuthUser(user): AuthUser,
) -> Result<Json<json::Value>> {
  let whatsapp = Whatsapp::from_config(&state.http, &state.config)?;
  let result = whatsapp.delete_instance(&user.id).await?;
  Ok(ok(result))
}
