use serde::Deserialize;
use uuid::Uuid;

use crate::{
  entity::{
    CampaignStatus,
    campaign::{self, AutoMessages, SkuList},
  },
  prelude::*,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaign {
  pub name: String,
  pub product_name: String,
  pub sku_array: Vec<String>,
  pub link_sample: String,
  pub product_qty: i32,
  pub brief: String,
  pub video_qty: i32,
  pub join_message: String,
  pub start_date: chrono::DateTime<Utc>,
  pub end_date: chrono::DateTime<Utc>,
  #[serde(default)]
  pub status: CampaignStatus,
  #[serde(default)]
  pub auto_messages: AutoMessages,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaign {
  pub name: Option<String>,
  pub product_name: Option<String>,
  pub sku_array: Option<Vec<String>>,
  pub link_sample: Option<String>,
  pub product_qty: Option<i32>,
  pub brief: Option<String>,
  pub video_qty: Option<i32>,
  pub join_message: Option<String>,
  pub start_date: Option<chrono::DateTime<Utc>>,
  pub end_date: Option<chrono::DateTime<Utc>>,
  pub status: Option<CampaignStatus>,
  pub auto_messages: Option<AutoMessages>,
}

pub struct Campaign<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Campaign<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    user_id: &str,
    input: CreateCampaign,
  ) -> Result<campaign::Model> {
    let now = Utc::now().naive_utc();

    let campaign = campaign::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      user_id: Set(user_id.to_string()),
      name: Set(input.name),
      product_name: Set(input.product_name),
      sku_array: Set(SkuList(input.sku_array)),
      link_sample: Set(input.link_sample),
      product_qty: Set(input.product_qty),
      brief: Set(input.brief),
      video_qty: Set(input.video_qty),
      join_message: Set(input.join_message.to_uppercase()),
      start_date: Set(input.start_date.naive_utc()),
      end_date: Set(input.end_date.naive_utc()),
      status: Set(input.status),
      auto_messages: Set(input.auto_messages),
      affiliator_count: Set(0),
      sample_sent_count: Set(0),
      video_count: Set(0),
      created_at: Set(now),
      updated_at: Set(now),
    };

    Ok(campaign.insert(self.db).await?)
  }

  pub async fn all(&self, user_id: &str) -> Result<Vec<campaign::Model>> {
    Ok(
      campaign::Entity::find()
        .filter(campaign::Column::UserId.eq(user_id))
        .order_by_desc(campaign::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  pub async fn by_id(
    &self,
    user_id: &str,
    id: &str,
  ) -> Result<campaign::Model> {
    campaign::Entity::find_by_id(id)
      .filter(campaign::Column::UserId.eq(user_id))
      .one(self.db)
      .await?
      .ok_or(Error::CampaignNotFound)
  }

  pub async fn update(
    &self,
    user_id: &str,
    id: &str,
    patch: UpdateCampaign,
  ) -> Result<campaign::Model> {
    let campaign = self.by_id(user_id, id).await?;

    let mut model = campaign::ActiveModel::from(campaign);
    if let Some(name) = patch.name {
      model.name = Set(name);
    }
    if let Some(product_name) = patch.product_name {
      model.product_name = Set(product_name);
    }
    if let Some(skus) = patch.sku_array {
      model.sku_array = Set(SkuList(skus));
    }
    if let Some(link) = patch.link_sample {
      model.link_sample = Set(link);
    }
    if let Some(qty) = patch.product_qty {
      model.product_qty = Set(qty);
    }
    if let Some(brief) = patch.brief {
      model.brief = Set(brief);
    }
    if let Some(qty) = patch.video_qty {
      model.video_qty = Set(qty);
    }
    if let Some(msg) = patch.join_message {
      model.join_message = Set(msg.to_uppercase());
    }
    if let Some(date) = patch.start_date {
      model.start_date = Set(date.naive_utc());
    }
    if let Some(date) = patch.end_date {
      model.end_date = Set(date.naive_utc());
    }
    if let Some(status) = patch.status {
      model.status = Set(status);
    }
    if let Some(auto) = patch.auto_messages {
      model.auto_messages = Set(auto);
    }
    model.updated_at = Set(Utc::now().naive_utc());

    Ok(model.update(self.db).await?)
  }

  pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
    let campaign = self.by_id(user_id, id).await?;
    campaign::Entity::delete_by_id(&campaign.id).exec(self.db).await?;
    Ok(())
  }

  /// Finds the tenant's active campaign whose SKU set contains `sku`.
  /// Matching is exact and case-sensitive; inactive campaigns never match.
  pub async fn find_active_by_sku(
    &self,
    user_id: &str,
    sku: &str,
  ) -> Result<Option<campaign::Model>> {
    let active = campaign::Entity::find()
      .filter(campaign::Column::UserId.eq(user_id))
      .filter(campaign::Column::Status.eq(CampaignStatus::Active))
      .all(self.db)
      .await?;

    Ok(active.into_iter().find(|c| c.sku_array.contains(sku)))
  }
}

#[cfg(test)]
pub use tests::fixture;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  pub fn fixture(skus: &[&str], status: CampaignStatus) -> CreateCampaign {
    CreateCampaign {
      name: "Summer Launch".into(),
      product_name: "Serum".into(),
      sku_array: skus.iter().map(|s| s.to_string()).collect(),
      link_sample: "https://shop.example.com/sample".into(),
      product_qty: 10,
      brief: "Post three videos featuring the serum.".into(),
      video_qty: 3,
      join_message: "join summer".into(),
      start_date: Utc::now(),
      end_date: Utc::now() + TimeDelta::days(30),
      status,
      auto_messages: Default::default(),
    }
  }

  #[tokio::test]
  async fn test_create_uppercases_join_message() {
    let db = test_db::setup().await;
    let campaign = Campaign::new(&db)
      .create("u1", fixture(&["SKU-A"], CampaignStatus::Active))
      .await
      .unwrap();

    assert_eq!(campaign.join_message, "JOIN SUMMER");
  }

  #[tokio::test]
  async fn test_by_id_is_tenant_scoped() {
    let db = test_db::setup().await;
    let sv = Campaign::new(&db);

    let campaign =
      sv.create("u1", fixture(&["SKU-A"], CampaignStatus::Active)).await.unwrap();

    assert!(sv.by_id("u1", &campaign.id).await.is_ok());
    assert!(matches!(
      sv.by_id("u2", &campaign.id).await,
      Err(Error::CampaignNotFound)
    ));
  }

  #[tokio::test]
  async fn test_find_active_by_sku() {
    let db = test_db::setup().await;
    let sv = Campaign::new(&db);

    let active = sv
      .create("u1", fixture(&["SKU-A", "SKU-B"], CampaignStatus::Active))
      .await
      .unwrap();
    sv.create("u1", fixture(&["SKU-C"], CampaignStatus::Inactive))
      .await
      .unwrap();

    let found = sv.find_active_by_sku("u1", "SKU-B").await.unwrap().unwrap();
    assert_eq!(found.id, active.id);

    // Inactive campaigns never match, even on an exact SKU.
    assert!(sv.find_active_by_sku("u1", "SKU-C").await.unwrap().is_none());

    // Matching is case-sensitive.
    assert!(sv.find_active_by_sku("u1", "sku-a").await.unwrap().is_none());

    // Other tenants never see the campaign.
    assert!(sv.find_active_by_sku("u2", "SKU-A").await.unwrap().is_none());
  }
}
