use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
  #[sea_orm(string_value = "recruitment")]
  #[default]
  Recruitment,
  #[sea_orm(string_value = "follow_up")]
  FollowUp,
  #[sea_orm(string_value = "custom")]
  Custom,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum BroadcastStatus {
  #[sea_orm(string_value = "ready")]
  #[default]
  Ready,
  #[sea_orm(string_value = "sending")]
  Sending,
  #[sea_orm(string_value = "failed")]
  Failed,
}

/// Singleton per user; `user_id` is the primary key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "broadcast_messages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: String,
  pub campaign_id: Option<String>,
  pub broadcast_group_id: Option<String>,
  pub achievement_status_filter: Option<String>,
  pub message: String,
  pub message_type: MessageType,
  pub status: BroadcastStatus,
  pub started_at: Option<DateTime>,
  pub completed_at: Option<DateTime>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "user::Entity",
    from = "Column::UserId",
    to = "user::Column::Id"
  )]
  User,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
