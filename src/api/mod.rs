//! HTTP surface. Handlers stay thin: validate input, call into `sv`, wrap
//! the result in the `{success, data}` envelope.

use axum::{
  Json, Router, extract::FromRequestParts, http::request::Parts, routing::get,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::{
  entity::{UserRole, user},
  prelude::*,
  state::AppState,
  sv,
};

mod admin;
mod affiliator;
mod auth;
mod broadcast;
mod campaign;
mod extension;
mod group;
mod sample;
mod settings;

pub const SESSION_COOKIE: &str = "session_token";

pub fn router() -> Router<Arc<AppState>> {
  Router::new()
    .route("/health", get(health))
    .nest("/api/auth", auth::routes())
    .nest("/api/admin", admin::routes())
    .nest("/api/campaigns", campaign::routes())
    .nest("/api/affiliators", affiliator::routes())
    .nest("/api/broadcast/groups", group::routes())
    .nest("/api/broadcast", broadcast::routes())
    .nest("/api/samples", sample::routes())
    .nest("/api/extension", extension::routes())
    .nest("/api/settings", settings::routes())
}

async fn health() -> Json<json::Value> {
  Json(json::json!({ "success": true, "status": "ok" }))
}

fn ok<T: Serialize>(data: T) -> Json<json::Value> {
  Json(json::json!({ "success": true, "data": data }))
}

fn ok_message(message: &str) -> Json<json::Value> {
  Json(json::json!({ "success": true, "message": message }))
}

fn ensure(issues: Vec<Issue>) -> Result<()> {
  if issues.is_empty() { Ok(()) } else { Err(Error::Validation(issues)) }
}

/// Indonesian WhatsApp numbers: country code 62 plus 9 to 12 digits.
fn validate_phone(issues: &mut Vec<Issue>, field: &str, value: &str) {
  let valid = value.starts_with("62")
    && (11..=14).contains(&value.len())
    && value.bytes().all(|b| b.is_ascii_digit());

  if !valid {
    issues.push(Issue::new(
      field,
      "Phone number must start with 62 followed by 9 to 12 digits",
    ));
  }
}

/// A tenant resolved from the session cookie.
pub struct AuthUser(pub user::Model);

impl FromRequestParts<Arc<AppState>> for AuthUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<AppState>,
  ) -> Result<Self> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar
      .get(SESSION_COOKIE)
      .map(|cookie| cookie.value().to_string())
      .ok_or(Error::Unauthorized)?;

    let user = sv::Auth::new(&state.db).resolve(&token).await?;
    Ok(Self(user))
  }
}

/// An [`AuthUser`] additionally holding the admin role.
pub struct AdminUser(pub user::Model);

impl FromRequestParts<Arc<AppState>> for AdminUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<AppState>,
  ) -> Result<Self> {
    let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

    if user.role != UserRole::Admin {
      return Err(Error::Forbidden);
    }

    Ok(Self(user))
  }
}

/// A tenant resolved from the extension's bearer token.
pub struct ExtensionUser(pub user::Model);

impl FromRequestParts<Arc<AppState>> for ExtensionUser {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &Arc<AppState>,
  ) -> Result<Self> {
    let token = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| value.strip_prefix("Bearer "))
      .ok_or(Error::Unauthorized)?;

    let claims =
      sv::auth::verify_extension_token(token, &state.config.server_secret)?;

    let user = user::Entity::find_by_id(&claims.sub)
      .one(&state.db)
      .await?
      .ok_or(Error::Unauthorized)?;

    Ok(Self(user))
  }
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request};
  use http_body_util::BodyExt;
  use reqwest::Client;
  use tower::util::ServiceExt;

  use super::*;
  use crate::{state::Config, sv::test_utils::test_db};

  async fn test_app() -> Router {
    let db = test_db::setup().await;
    let config = Config {
      server_secret: "test-secret".into(),
      client_url: None,
      gemini_api_key: None,
      gemini_model: "gemini-2.5-flash-lite".into(),
      broadcast_webhook_url: None,
      evolution_api_url: None,
      evolution_api_key: None,
      webhook_url: None,
      webhook_secret: None,
    };
    let state = Arc::new(AppState { db, config, http: Client::new() });
    router().with_state(state)
  }

  #[tokio::test]
  async fn test_health() {
    let app = test_app().await;

    let response = app
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();

    assert_eq!(response.status(), 200);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value: json::Value = json::from_slice(&body).unwrap();
    assert_eq!(value["success"], true);
  }

  #[tokio::test]
  async fn test_protected_routes_require_session() {
    let app = test_app().await;

    for path in ["/api/campaigns", "/api/affiliators", "/api/samples"] {
      let response = app
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
      assert_eq!(response.status(), 401, "{path}");
    }
  }

  #[tokio::test]
  async fn test_admin_routes_reject_regular_users() {
    let db = test_db::setup().await;
    let created = sv::User::new(&db)
      .create(sv::user::NewUser {
        name: "Seller".into(),
        email: "seller@example.com".into(),
        phone_number: "628123456789".into(),
        tier: crate::entity::UserTier::Starter,
        expiry_date: None,
      })
      .await
      .unwrap();
    let session =
      sv::Auth::new(&db).create_session(&created.user.id).await.unwrap();

    let config = Config {
      server_secret: "test-secret".into(),
      client_url: None,
      gemini_api_key: None,
      gemini_model: "gemini-2.5-flash-lite".into(),
      broadcast_webhook_url: None,
      evolution_api_url: None,
      evolution_api_key: None,
      webhook_url: None,
      webhook_secret: None,
    };
    let state = Arc::new(AppState { db, config, http: Client::new() });
    let app = router().with_state(state);

    let response = app
      .oneshot(
        Request::get("/api/admin/users")
          .header("cookie", format!("{SESSION_COOKIE}={}", session.token))
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();

    assert_eq!(response.status(), 403);
  }
}
