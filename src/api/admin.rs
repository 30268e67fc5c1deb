use axum::{
  Json, Router,
  extract::{Path, State},
  routing::{get, post},
};

use crate::{
  api::{AdminUser, ensure, ok, ok_message, validate_phone},
  prelude::*,
  state::AppState,
  sv::{
    self,
    user::{NewUser, UserPatch},
  },
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/users", get(list_users).post(create_user))
    .route(
      "/users/{id}",
      get(get_user).put(update_user).delete(delete_user),
    )
    .route("/users/{id}/license", post(regenerate_license))
}

async fn list_users(
  State(state): State<Arc<AppState>>,
  AdminUser(_): AdminUser,
) -> Result<Json<json::Value>> {
  let users = sv::User::new(&state.db).all().await?;
  Ok(ok(users))
}

async fn create_user(
  State(state): State<Arc<AppState>>,
  AdminUser(_): AdminUser,
  Json(req): Json<NewUser>,
) -> Result<Json<json::Value>> {
  let mut issues = vec![];
  if req.name.trim().len() < 3 {
    issues.push(Issue::new("name", "Name must be at least 3 characters"));
  }
  if !req.email.contains('@') {
    issues.push(Issue::new("email", "Invalid email address"));
  }
  validate_phone(&mut issues, "phoneNumber", &req.phone_number);
  ensure(issues)?;

  let created = sv::User::new(&state.db).create(req).await?;
  Ok(ok(created))
}

async fn get_user(
  State(state): State<Arc<AppState>>,
  AdminUser(_): AdminUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  let user = sv::User::new(&state.db).by_id(&id).await?;
  let subscription = sv::User::subscription_view(&user);

  Ok(ok(json::json!({ "user": user, "subscription": subscription })))
}

async fn update_user(
  State(state): State<Arc<AppState>>,
  AdminUser(_): AdminUser,
  Path(id): Path<String>,
  Json(patch): Json<UserPatch>,
) -> Result<Json<json::Value>> {
  let mut issues = vec![];
  if let Some(name) = &patch.name
    && name.trim().len() < 3
  {
    issues.push(Issue::new("name", "Name must be at least 3 characters"));
  }
  if let Some(phone) = &patch.phone_number {
    validate_phone(&mut issues, "phoneNumber", phone);
  }
  ensure(issues)?;

  let user = sv::User::new(&state.db).update(&id, patch).await?;
  Ok(ok(user))
}

async fn delete_user(
  State(state): State<Arc<AppState>>,
  AdminUser(admin): AdminUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  if admin.id == id {
    return Err(Error::InvalidArgs("Cannot delete your own account".into()));
  }

  sv::User::new(&state.db).delete(&id).await?;
  Ok(ok_message("User deleted"))
}

async fn regenerate_license(
  State(state): State<Arc<AppState>>,
  AdminUser(_): AdminUser,
  Path(id): Path<String>,
) -> Result<Json<json::Value>> {
  let key = sv::User::new(&state.db).regenerate_license(&id).await?;
  Ok(ok(json::json!({ "licenseKey": key })))
}
