use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{affiliator, campaign, sample_request, session};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  #[sea_orm(string_value = "user")]
  #[default]
  User,
  #[sea_orm(string_value = "admin")]
  Admin,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum UserTier {
  #[sea_orm(string_value = "starter")]
  #[default]
  Starter,
  #[sea_orm(string_value = "growth")]
  Growth,
  #[sea_orm(string_value = "scale")]
  Scale,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
  #[sea_orm(string_value = "active")]
  #[default]
  Active,
  #[sea_orm(string_value = "expired")]
  Expired,
  #[sea_orm(string_value = "canceled")]
  Canceled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub name: String,
  #[sea_orm(unique)]
  pub email: String,
  pub email_verified: bool,
  pub phone_number: Option<String>,
  pub image: Option<String>,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role: UserRole,
  pub tier: UserTier,
  pub subscription_status: SubscriptionStatus,
  pub subscription_start: DateTime,
  pub subscription_expiry: Option<DateTime>,
  pub broadcast_limit: i64,
  pub broadcast_used: i64,
  pub tracking_limit: i64,
  pub tracking_used: i64,
  pub content_limit: i64,
  pub content_used: i64,
  pub history_broadcast_used: i64,
  pub history_tracking_used: i64,
  pub history_content_used: i64,
  #[sea_orm(unique)]
  pub license_key: Option<String>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "session::Entity")]
  Sessions,
  #[sea_orm(has_many = "campaign::Entity")]
  Campaigns,
  #[sea_orm(has_many = "affiliator::Entity")]
  Affiliators,
  #[sea_orm(has_many = "sample_request::Entity")]
  SampleRequests,
}

impl Related<session::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Sessions.def()
  }
}

impl Related<campaign::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Campaigns.def()
  }
}

impl Related<affiliator::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Affiliators.def()
  }
}

impl Related<sample_request::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::SampleRequests.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
