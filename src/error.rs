use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
  pub field: String,
  pub message: String,
}

impl Issue {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self { field: field.into(), message: message.into() }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("Unauthorized")]
  Unauthorized,
  #[error("Forbidden: admin access only")]
  Forbidden,
  #[error("Invalid license key")]
  InvalidLicense,
  #[error("User not found")]
  UserNotFound,
  #[error("Campaign not found")]
  CampaignNotFound,
  #[error("Affiliator not found")]
  AffiliatorNotFound,
  #[error("Group not found")]
  GroupNotFound,
  #[error("Sample not found")]
  SampleNotFound,
  #[error("{0}")]
  InvalidArgs(String),
  #[error("Validation error")]
  Validation(Vec<Issue>),
  #[error("Gemini: {0}")]
  Gemini(String),
  #[error("Webhook: {0}")]
  Webhook(String),
  #[error("WhatsApp: {0}")]
  Whatsapp(String),
  #[error(transparent)]
  Db(#[from] sea_orm::DbErr),
  #[error("{0}")]
  Internal(String),
}

impl Error {
  fn status(&self) -> StatusCode {
    match self {
      Error::Unauthorized | Error::InvalidLicense => StatusCode::UNAUTHORIZED,
      Error::Forbidden => StatusCode::FORBIDDEN,
      Error::UserNotFound
      | Error::CampaignNotFound
      | Error::AffiliatorNotFound
      | Error::GroupNotFound
      | Error::SampleNotFound => StatusCode::NOT_FOUND,
      Error::InvalidArgs(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
      Error::Gemini(_)
      | Error::Webhook(_)
      | Error::Whatsapp(_)
      | Error::Db(_)
      | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Serialize)]
struct ErrorBody {
  success: bool,
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  errors: Option<Vec<Issue>>,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();

    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!("request failed: {self}");
    }

    let errors = match &self {
      Error::Validation(issues) => Some(issues.clone()),
      _ => None,
    };

    let body =
      ErrorBody { success: false, message: self.to_string(), errors };

    (status, Json(body)).into_response()
  }
}
