//! Reconciliation of sample-request batches synced from the browser
//! extension. Each item is handled independently: deduplicated against
//! stored rows, guarded against redacted data, and linked to a campaign
//! and affiliator only when a broadcast log proves the pair was invited.

use sea_orm::Condition;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  entity::{affiliator, broadcast_log, sample_request},
  prelude::*,
  sv,
};

/// Platforms redact withheld contact data with asterisks; such items must
/// never be persisted as ground truth.
const REDACTION_MARKER: char = '*';

fn default_qty() -> i32 {
  1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItem {
  pub request_id: String,
  pub product_name: String,
  pub sku: String,
  #[serde(default = "default_qty")]
  pub qty: i32,
  pub affiliator_name: String,
  pub affiliator_username: String,
  #[serde(default)]
  pub affiliator_phone_number: String,
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub courier: String,
  #[serde(default)]
  pub tracking_number: String,
  pub request_date: Option<chrono::DateTime<Utc>>,
}

impl SyncItem {
  fn is_masked(&self) -> bool {
    self.affiliator_name.contains(REDACTION_MARKER)
      || self.affiliator_username.contains(REDACTION_MARKER)
      || self.affiliator_phone_number.contains(REDACTION_MARKER)
  }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
  pub synced: u32,
  pub duplicates: u32,
  pub errors: u32,
}

enum Outcome {
  Synced,
  Duplicate,
  Masked,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleQuery {
  pub page: Option<u64>,
  pub limit: Option<u64>,
  pub search: Option<String>,
  pub campaign_id: Option<String>,
  pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
  pub page: u64,
  pub limit: u64,
  pub total: u64,
  pub pages: u64,
}

pub struct Sample<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Sample<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Processes a sync batch. Items are independent: one failure never
  /// blocks the rest, and the batch never partially rolls back.
  pub async fn sync(
    &self,
    user_id: &str,
    items: Vec<SyncItem>,
  ) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    for item in items {
      match self.sync_one(user_id, &item).await {
        Ok(Outcome::Synced) => report.synced += 1,
        Ok(Outcome::Duplicate) => report.duplicates += 1,
        Ok(Outcome::Masked) => {
          warn!("skipping masked sample {} for {user_id}", item.request_id);
          report.errors += 1;
        }
        Err(err) => {
          error!("failed to sync sample {}: {err}", item.request_id);
          report.errors += 1;
        }
      }
    }

    Ok(report)
  }

  async fn sync_one(&self, user_id: &str, item: &SyncItem) -> Result<Outcome> {
    let existing = sample_request::Entity::find()
      .filter(sample_request::Column::UserId.eq(user_id))
      .filter(sample_request::Column::RequestId.eq(&item.request_id))
      .filter(sample_request::Column::Sku.eq(&item.sku))
      .one(self.db)
      .await?;

    if existing.is_some() {
      return Ok(Outcome::Duplicate);
    }

    if item.is_masked() {
      return Ok(Outcome::Masked);
    }

    let campaign =
      sv::Campaign::new(self.db).find_active_by_sku(user_id, &item.sku).await?;

    let affiliator = affiliator::Entity::find()
      .filter(affiliator::Column::UserId.eq(user_id))
      .filter(
        affiliator::Column::TiktokUsername.eq(&item.affiliator_username),
      )
      .one(self.db)
      .await?;

    // A link is attached only when both candidates exist AND a broadcast
    // log ties that exact pair; a sample is never linked to only one side.
    let (campaign_id, affiliator_id) = match (campaign, affiliator) {
      (Some(campaign), Some(affiliator)) => {
        if self.invited(user_id, &campaign.id, &affiliator.id).await? {
          (Some(campaign.id), Some(affiliator.id))
        } else {
          (None, None)
        }
      }
      _ => (None, None),
    };

    let now = Utc::now().naive_utc();
    sample_request::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      user_id: Set(user_id.to_string()),
      campaign_id: Set(campaign_id),
      affiliator_id: Set(affiliator_id),
      request_id: Set(item.request_id.clone()),
      product_name: Set(item.product_name.clone()),
      sku: Set(item.sku.clone()),
      qty: Set(item.qty),
      affiliator_name: Set(item.affiliator_name.clone()),
      affiliator_username: Set(item.affiliator_username.clone()),
      affiliator_phone_number: Set(item.affiliator_phone_number.clone()),
      status: Set(item.status.clone()),
      courier: Set(item.courier.clone()),
      tracking_number: Set(item.tracking_number.clone()),
      request_date: Set(
        item.request_date.map(|d| d.naive_utc()).unwrap_or(now),
      ),
      created_at: Set(now),
    }
    .insert(self.db)
    .await?;

    Ok(Outcome::Synced)
  }

  async fn invited(
    &self,
    user_id: &str,
    campaign_id: &str,
    affiliator_id: &str,
  ) -> Result<bool> {
    let count = broadcast_log::Entity::find()
      .filter(broadcast_log::Column::UserId.eq(user_id))
      .filter(broadcast_log::Column::CampaignId.eq(campaign_id))
      .filter(broadcast_log::Column::AffiliatorId.eq(affiliator_id))
      .count(self.db)
      .await?;

    Ok(count > 0)
  }

  /// Request ids already stored for the tenant, for client-side dedup.
  pub async fn existing_ids(&self, user_id: &str) -> Result<Vec<String>> {
    let rows = sample_request::Entity::find()
      .filter(sample_request::Column::UserId.eq(user_id))
      .all(self.db)
      .await?;

    Ok(rows.into_iter().map(|r| r.request_id).collect())
  }

  pub async fn list(
    &self,
    user_id: &str,
    query: SampleQuery,
  ) -> Result<(Vec<sample_request::Model>, PageMeta)> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);

    let mut find = sample_request::Entity::find()
      .filter(sample_request::Column::UserId.eq(user_id));

    if let Some(term) = query.search.as_deref() {
      find = find.filter(
        Condition::any()
          .add(sample_request::Column::ProductName.contains(term))
          .add(sample_request::Column::Sku.contains(term))
          .add(sample_request::Column::AffiliatorName.contains(term))
          .add(sample_request::Column::AffiliatorUsername.contains(term))
          .add(sample_request::Column::RequestId.contains(term)),
      );
    }

    // "inside"/"outside" are sentinels for linked/unlinked samples.
    match query.campaign_id.as_deref() {
      Some("outside") => {
        find = find.filter(sample_request::Column::CampaignId.is_null());
      }
      Some("inside") => {
        find = find.filter(sample_request::Column::CampaignId.is_not_null());
      }
      Some(id) => {
        find = find.filter(sample_request::Column::CampaignId.eq(id));
      }
      None => {}
    }

    if let Some(status) = query.status.as_deref() {
      find = find.filter(sample_request::Column::Status.eq(status));
    }

    let paginator = find
      .order_by_desc(sample_request::Column::RequestDate)
      .paginate(self.db, limit);

    let total = paginator.num_items().await?;
    let pages = paginator.num_pages().await?;
    let rows = paginator.fetch_page(page - 1).await?;

    Ok((rows, PageMeta { page, limit, total, pages }))
  }

  pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
    let sample = sample_request::Entity::find_by_id(id)
      .filter(sample_request::Column::UserId.eq(user_id))
      .one(self.db)
      .await?
      .ok_or(Error::SampleNotFound)?;

    sample_request::Entity::delete_by_id(&sample.id).exec(self.db).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    entity::{CampaignStatus, campaign},
    sv::{affiliator::fixture as affiliator_fixture, campaign::fixture, test_utils::test_db},
  };

  fn item(request_id: &str, sku: &str, username: &str) -> SyncItem {
    SyncItem {
      request_id: request_id.into(),
      product_name: "Serum".into(),
      sku: sku.into(),
      qty: 1,
      affiliator_name: "Alice".into(),
      affiliator_username: username.into(),
      affiliator_phone_number: "628123456789".into(),
      status: "Pending".into(),
      courier: String::new(),
      tracking_number: String::new(),
      request_date: None,
    }
  }

  async fn seed(
    db: &DatabaseConnection,
  ) -> (campaign::Model, affiliator::Model) {
    let campaign = sv::Campaign::new(db)
      .create("u1", fixture(&["SKU-A"], CampaignStatus::Active))
      .await
      .unwrap();
    let affiliator = sv::Affiliator::new(db)
      .create("u1", affiliator_fixture("alice", "Alice"))
      .await
      .unwrap();
    (campaign, affiliator)
  }

  async fn invite(
    db: &DatabaseConnection,
    campaign_id: &str,
    affiliator_id: &str,
  ) {
    let now = Utc::now().naive_utc();
    broadcast_log::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      user_id: Set("u1".into()),
      campaign_id: Set(campaign_id.into()),
      affiliator_id: Set(affiliator_id.into()),
      is_join: Set(false),
      join_confirmation_date: Set(None),
      content_progress: Set(0),
      achievement_status: Set(Default::default()),
      created_at: Set(now),
      updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
  }

  #[tokio::test]
  async fn test_sync_links_only_with_broadcast_log() {
    let db = test_db::setup().await;
    let (campaign, affiliator) = seed(&db).await;
    let sv = Sample::new(&db);

    // Both candidates match but the pair was never invited.
    let report =
      sv.sync("u1", vec![item("R1", "SKU-A", "alice")]).await.unwrap();
    assert_eq!(report, SyncReport { synced: 1, duplicates: 0, errors: 0 });

    let stored = sample_request::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(stored.campaign_id, None);
    assert_eq!(stored.affiliator_id, None);

    // With a broadcast log for the exact pair, both links attach.
    invite(&db, &campaign.id, &affiliator.id).await;
    let report =
      sv.sync("u1", vec![item("R2", "SKU-A", "alice")]).await.unwrap();
    assert_eq!(report.synced, 1);

    let stored = sample_request::Entity::find()
      .filter(sample_request::Column::RequestId.eq("R2"))
      .one(&db)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(stored.campaign_id.as_deref(), Some(campaign.id.as_str()));
    assert_eq!(stored.affiliator_id.as_deref(), Some(affiliator.id.as_str()));
  }

  #[tokio::test]
  async fn test_sync_never_links_one_side_only() {
    let db = test_db::setup().await;
    let (campaign, affiliator) = seed(&db).await;
    invite(&db, &campaign.id, &affiliator.id).await;
    let sv = Sample::new(&db);

    // SKU matches, username does not.
    sv.sync("u1", vec![item("R1", "SKU-A", "stranger")]).await.unwrap();
    // Username matches, SKU does not.
    sv.sync("u1", vec![item("R2", "SKU-X", "alice")]).await.unwrap();

    for row in sample_request::Entity::find().all(&db).await.unwrap() {
      assert_eq!(row.campaign_id, None);
      assert_eq!(row.affiliator_id, None);
    }
  }

  #[tokio::test]
  async fn test_sync_classifies_duplicates() {
    let db = test_db::setup().await;
    seed(&db).await;
    let sv = Sample::new(&db);

    sv.sync("u1", vec![item("R1", "SKU-A", "alice")]).await.unwrap();
    let report =
      sv.sync("u1", vec![item("R1", "SKU-A", "alice")]).await.unwrap();
    assert_eq!(report, SyncReport { synced: 0, duplicates: 1, errors: 0 });

    // Same request id under a different SKU is a separate request.
    let report =
      sv.sync("u1", vec![item("R1", "SKU-B", "alice")]).await.unwrap();
    assert_eq!(report.synced, 1);

    // Another tenant syncing the same id is unaffected.
    let report =
      sv.sync("u2", vec![item("R1", "SKU-A", "alice")]).await.unwrap();
    assert_eq!(report.synced, 1);
  }

  #[tokio::test]
  async fn test_sync_rejects_masked_data() {
    let db = test_db::setup().await;
    seed(&db).await;
    let sv = Sample::new(&db);

    let mut masked_name = item("R1", "SKU-A", "alice");
    masked_name.affiliator_name = "A***e".into();
    let mut masked_phone = item("R2", "SKU-A", "alice");
    masked_phone.affiliator_phone_number = "62812****89".into();

    let report =
      sv.sync("u1", vec![masked_name, masked_phone]).await.unwrap();
    assert_eq!(report, SyncReport { synced: 0, duplicates: 0, errors: 2 });
    assert_eq!(sample_request::Entity::find().all(&db).await.unwrap().len(), 0);
  }

  #[tokio::test]
  async fn test_resynced_request_stays_duplicate_even_when_masked() {
    let db = test_db::setup().await;
    seed(&db).await;
    let sv = Sample::new(&db);

    sv.sync("u1", vec![item("R1", "SKU-A", "alice")]).await.unwrap();

    // Platforms redact contact fields on later scrapes; a request that is
    // already stored classifies as a duplicate, not as an error.
    let mut masked = item("R1", "SKU-A", "alice");
    masked.affiliator_name = "A***e".into();
    masked.affiliator_phone_number = "62812****89".into();

    let report = sv.sync("u1", vec![masked]).await.unwrap();
    assert_eq!(report, SyncReport { synced: 0, duplicates: 1, errors: 0 });
    assert_eq!(
      sample_request::Entity::find().all(&db).await.unwrap().len(),
      1
    );
  }

  #[tokio::test]
  async fn test_sync_one_failure_does_not_block_batch() {
    let db = test_db::setup().await;
    seed(&db).await;
    let sv = Sample::new(&db);

    let mut masked = item("R2", "SKU-A", "alice");
    masked.affiliator_username = "al***".into();

    let report = sv
      .sync("u1", vec![
        item("R1", "SKU-A", "alice"),
        masked,
        item("R3", "SKU-A", "alice"),
      ])
      .await
      .unwrap();

    assert_eq!(report, SyncReport { synced: 2, duplicates: 0, errors: 1 });
  }

  #[tokio::test]
  async fn test_existing_ids() {
    let db = test_db::setup().await;
    seed(&db).await;
    let sv = Sample::new(&db);

    sv.sync("u1", vec![
      item("R1", "SKU-A", "alice"),
      item("R2", "SKU-A", "alice"),
    ])
    .await
    .unwrap();

    let mut ids = sv.existing_ids("u1").await.unwrap();
    ids.sort();
    assert_eq!(ids, vec!["R1".to_string(), "R2".to_string()]);
    assert!(sv.existing_ids("u2").await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_list_filters_and_paginates() {
    let db = test_db::setup().await;
    let (campaign, affiliator) = seed(&db).await;
    invite(&db, &campaign.id, &affiliator.id).await;
    let sv = Sample::new(&db);

    sv.sync("u1", vec![
      item("R1", "SKU-A", "alice"),
      item("R2", "SKU-X", "bob"),
      item("R3", "SKU-Y", "carol"),
    ])
    .await
    .unwrap();

    // Linked vs unlinked sentinels.
    let (inside, _) = sv
      .list("u1", SampleQuery {
        campaign_id: Some("inside".into()),
        ..Default::default()
      })
      .await
      .unwrap();
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].request_id, "R1");

    let (outside, _) = sv
      .list("u1", SampleQuery {
        campaign_id: Some("outside".into()),
        ..Default::default()
      })
      .await
      .unwrap();
    assert_eq!(outside.len(), 2);

    // Search over request id.
    let (hits, _) = sv
      .list("u1", SampleQuery { search: Some("R2".into()), ..Default::default() })
      .await
      .unwrap();
    assert_eq!(hits.len(), 1);

    // Pagination meta.
    let (rows, meta) = sv
      .list("u1", SampleQuery {
        page: Some(2),
        limit: Some(2),
        ..Default::default()
      })
      .await
      .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(meta.total, 3);
    assert_eq!(meta.pages, 2);
  }

  #[tokio::test]
  async fn test_delete_is_tenant_scoped() {
    let db = test_db::setup().await;
    seed(&db).await;
    let sv = Sample::new(&db);

    sv.sync("u1", vec![item("R1", "SKU-A", "alice")]).await.unwrap();
    let stored =
      sample_request::Entity::find().one(&db).await.unwrap().unwrap();

    assert!(matches!(
      sv.delete("u2", &stored.id).await,
      Err(Error::SampleNotFound)
    ));
    sv.delete("u1", &stored.id).await.unwrap();
    assert!(sample_request::Entity::find().one(&db).await.unwrap().is_none());
  }
}
