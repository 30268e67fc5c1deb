use json as serde_json;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
  #[sea_orm(string_value = "active")]
  #[default]
  Active,
  #[sea_orm(string_value = "inactive")]
  Inactive,
}

/// SKU set used to match inbound sample requests to this campaign.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize, FromJsonQueryResult)]
pub struct SkuList(pub Vec<String>);

impl SkuList {
  pub fn contains(&self, sku: &str) -> bool {
    self.0.iter().any(|s| s == sku)
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[derive(Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoMessages {
  pub welcome_message: String,
  pub sample_delivery_message: String,
  pub friendly_reminder_message: String,
  pub firm_reminder_message: String,
  pub emergency_reminder_message: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub user_id: String,
  pub name: String,
  pub product_name: String,
  pub sku_array: SkuList,
  pub link_sample: String,
  pub product_qty: i32,
  pub brief: String,
  pub video_qty: i32,
  pub join_message: String,
  pub start_date: DateTime,
  pub end_date: DateTime,
  pub status: CampaignStatus,
  pub auto_messages: AutoMessages,
  pub affiliator_count: i32,
  pub sample_sent_count: i32,
  pub video_count: i32,
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
