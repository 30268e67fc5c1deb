use sea_orm::Condition;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entity::affiliator, prelude::*};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAffiliator {
  pub tiktok_username: String,
  pub name: String,
  pub phone_number: String,
  #[serde(default)]
  pub notes: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAffiliator {
  pub tiktok_username: Option<String>,
  pub name: Option<String>,
  pub phone_number: Option<String>,
  pub quality_score: Option<i32>,
  pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
  pub inserted: u32,
  pub updated: u32,
}

pub struct Affiliator<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Affiliator<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  async fn by_username(
    &self,
    user_id: &str,
    username: &str,
  ) -> Result<Option<affiliator::Model>> {
    Ok(
      affiliator::Entity::find()
        .filter(affiliator::Column::UserId.eq(user_id))
        .filter(affiliator::Column::TiktokUsername.eq(username))
        .one(self.db)
        .await?,
    )
  }

  pub async fn create(
    &self,
    user_id: &str,
    input: CreateAffiliator,
  ) -> Result<affiliator::Model> {
    if self.by_username(user_id, &input.tiktok_username).await?.is_some() {
      return Err(Error::InvalidArgs(format!(
        "Affiliator with username {} already exists",
        input.tiktok_username
      )));
    }

    self.insert(user_id, input).await
  }

  async fn insert(
    &self,
    user_id: &str,
    input: CreateAffiliator,
  ) -> Result<affiliator::Model> {
    let now = Utc::now().naive_utc();

    let affiliator = affiliator::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      user_id: Set(user_id.to_string()),
      tiktok_username: Set(input.tiktok_username),
      name: Set(input.name),
      phone_number: Set(input.phone_number),
      quality_score: Set(0),
      total_campaigns: Set(0),
      notes: Set(input.notes),
      created_at: Set(now),
      updated_at: Set(now),
    };

    Ok(affiliator.insert(self.db).await?)
  }

  pub async fn all(
    &self,
    user_id: &str,
    search: Option<&str>,
  ) -> Result<Vec<affiliator::Model>> {
    let mut query = affiliator::Entity::find()
      .filter(affiliator::Column::UserId.eq(user_id));

    if let Some(term) = search {
      query = query.filter(
        Condition::any()
          .add(affiliator::Column::TiktokUsername.contains(term))
          .add(affiliator::Column::Name.contains(term)),
      );
    }

    Ok(
      query.order_by_desc(affiliator::Column::CreatedAt).all(self.db).await?,
    )
  }

  pub async fn by_id(
    &self,
    user_id: &str,
    id: &str,
  ) -> Result<affiliator::Model> {
    affiliator::Entity::find_by_id(id)
      .filter(affiliator::Column::UserId.eq(user_id))
      .one(self.db)
      .await?
      .ok_or(Error::AffiliatorNotFound)
  }

  pub async fn update(
    &self,
    user_id: &str,
    id: &str,
    patch: UpdateAffiliator,
  ) -> Result<affiliator::Model> {
    let affiliator = self.by_id(user_id, id).await?;

    let mut model = affiliator::ActiveModel::from(affiliator);
    if let Some(username) = patch.tiktok_username {
      model.tiktok_username = Set(username);
    }
    if let Some(name) = patch.name {
      model.name = Set(name);
    }
    if let Some(phone) = patch.phone_number {
      model.phone_number = Set(phone);
    }
    if let Some(score) = patch.quality_score {
      model.quality_score = Set(score);
    }
    if let Some(notes) = patch.notes {
      model.notes = Set(notes);
    }
    model.updated_at = Set(Utc::now().naive_utc());

    Ok(model.update(self.db).await?)
  }

  pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
    let affiliator = self.by_id(user_id, id).await?;
    affiliator::Entity::delete_by_id(&affiliator.id).exec(self.db).await?;
    Ok(())
  }

  /// Bulk upsert keyed on (user, tiktok_username). Importing the same
  /// username twice leaves one row carrying the latest payload's fields.
  pub async fn bulk_import(
    &self,
    user_id: &str,
    items: Vec<CreateAffiliator>,
  ) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    for item in items {
      match self.by_username(user_id, &item.tiktok_username).await? {
        Some(existing) => {
          affiliator::ActiveModel {
            name: Set(item.name),
            phone_number: Set(item.phone_number),
            notes: Set(item.notes),
            updated_at: Set(Utc::now().naive_utc()),
            ..existing.into()
          }
          .update(self.db)
          .await?;
          report.updated += 1;
        }
        None => {
          self.insert(user_id, item).await?;
          report.inserted += 1;
        }
      }
    }

    Ok(report)
  }
}

#[cfg(test)]
pub use tests::fixture;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  pub fn fixture(username: &str, name: &str) -> CreateAffiliator {
    CreateAffiliator {
      tiktok_username: username.into(),
      name: name.into(),
      phone_number: "628123456789".into(),
      notes: String::new(),
    }
  }

  #[tokio::test]
  async fn test_create_rejects_duplicate_username() {
    let db = test_db::setup().await;
    let sv = Affiliator::new(&db);

    sv.create("u1", fixture("alice", "Alice")).await.unwrap();
    let result = sv.create("u1", fixture("alice", "Alice Again")).await;
    assert!(matches!(result, Err(Error::InvalidArgs(_))));

    // Same username under another tenant is fine.
    sv.create("u2", fixture("alice", "Other Alice")).await.unwrap();
  }

  #[tokio::test]
  async fn test_bulk_import_is_idempotent() {
    let db = test_db::setup().await;
    let sv = Affiliator::new(&db);

    let first = sv
      .bulk_import("u1", vec![fixture("alice", "Alice"), fixture("bob", "Bob")])
      .await
      .unwrap();
    assert_eq!(first.inserted, 2);
    assert_eq!(first.updated, 0);

    let second = sv
      .bulk_import("u1", vec![fixture("alice", "Alice Renamed")])
      .await
      .unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.updated, 1);

    let all = sv.all("u1", None).await.unwrap();
    assert_eq!(all.len(), 2);
    let alice =
      all.iter().find(|a| a.tiktok_username == "alice").unwrap();
    assert_eq!(alice.name, "Alice Renamed");
  }

  #[tokio::test]
  async fn test_search_matches_username_and_name() {
    let db = test_db::setup().await;
    let sv = Affiliator::new(&db);

    sv.create("u1", fixture("alice", "Alice")).await.unwrap();
    sv.create("u1", fixture("bob", "Robert")).await.unwrap();

    let hits = sv.all("u1", Some("ali")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].tiktok_username, "alice");

    let hits = sv.all("u1", Some("Rob")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].tiktok_username, "bob");
  }

  #[tokio::test]
  async fn test_delete_is_tenant_scoped() {
    let db = test_db::setup().await;
    let sv = Affiliator::new(&db);

    let aff = sv.create("u1", fixture("alice", "Alice")).await.unwrap();
    assert!(matches!(
      sv.delete("u2", &aff.id).await,
      Err(Error::AffiliatorNotFound)
    ));
    sv.delete("u1", &aff.id).await.unwrap();
  }
}
