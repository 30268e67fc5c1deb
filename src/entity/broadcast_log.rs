use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{affiliator, campaign, user};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AchievementStatus {
  #[sea_orm(string_value = "no_response_yet")]
  #[default]
  NoResponseYet,
  #[sea_orm(string_value = "not_started")]
  NotStarted,
  #[sea_orm(string_value = "in_progress")]
  InProgress,
  #[sea_orm(string_value = "completed")]
  Completed,
  #[sea_orm(string_value = "failed")]
  Failed,
}

/// One row per (campaign, affiliator) pair; the record that an affiliator
/// was actually invited to a campaign.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "broadcast_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub user_id: String,
  pub campaign_id: String,
  pub affiliator_id: String,
  pub is_join: bool,
  pub join_confirmation_date: Option<DateTime>,
  pub content_progress: i32,
  pub achievement_status: AchievementStatus,
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
  #[sea_orm(
    belongs_to = "campaign::Entity",
    from = "Column::CampaignId",
    to = "campaign::Column::Id"
  )]
  Campaign,
  #[sea_orm(
    belongs_to = "affiliator::Entity",
    from = "Column::AffiliatorId",
    to = "affiliator::Column::Id"
  )]
  Affiliator,
}

impl Related<user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl Related<campaign::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Campaign.def()
  }
}

impl Related<affiliator::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Affiliator.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
