use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use axum_extra::extract::{
  CookieJar,
  cookie::{Cookie, SameSite},
};
use serde::Deserialize;

use crate::{
  api::{AuthUser, SESSION_COOKIE, ensure, ok, ok_message},
  prelude::*,
  state::AppState,
  sv,
};

pub fn routes() -> Router<Arc<AppState>> {
  Router::new()
    .route("/login", post(login))
    .route("/logout", post(logout))
    .route("/me", get(me))
}

#[derive(Deserialize)]
struct Login {
  email: String,
  password: String,
}

async fn login(
  State(state): State<Arc<AppState>>,
  jar: CookieJar,
  Json(req): Json<Login>,
) -> Result<(CookieJar, Json<json::Value>)> {
  let mut issues = vec![];
  if !req.email.contains('@') {
    issues.push(Issue::new("email", "Invalid email address"));
  }
  if req.password.is_empty() {
    issues.push(Issue::new("password", "Password is required"));
  }
  ensure(issues)?;

  let (user, session) =
    sv::Auth::new(&state.db).login(&req.email, &req.password).await?;

  let cookie = Cookie::build((SESSION_COOKIE, session.token))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax);

  Ok((jar.add(cookie), ok(user)))
}

async fn logout(
  State(state): State<Arc<AppState>>,
  jar: CookieJar,
) -> Result<(CookieJar, Json<json::Value>)> {
  if let Some(cookie) = jar.get(SESSION_COOKIE) {
    sv::Auth::new(&state.db).logout(cookie.value()).await?;
  }

  let removal = Cookie::build((SESSION_COOKIE, "")).path("/");
  Ok((jar.remove(removal), ok_message("Logged out")))
}

async fn me(AuthUser(user): AuthUser) -> Json<json::Value> {
  ok(user)
}
