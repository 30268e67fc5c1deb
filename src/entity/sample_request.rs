use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{affiliator, campaign, user};

/// Inbound sample request captured by the extension sync. `campaign_id` and
/// `affiliator_id` are nullable; an unlinked row is a valid terminal state.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sample_requests")]
#[serde(rename_all = "camelCase")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: String,
  pub user_id: String,
  pub campaign_id: Option<String>,
  pub affiliator_id: Option<String>,
  pub request_id: String,
  pub product_name: String,
  pub sku: String,
  pub qty: i32,
  pub affiliator_name: String,
  pub affiliator_username: String,
  pub affiliator_phone_number: String,
  pub status: String,
  pub courier: String,
  pub tracking_number: String,
  pub request_date: DateTime,
  pub created_at: DateTime,
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
