use serde::Deserialize;
use uuid::Uuid;

use crate::{
  entity::broadcast_group::{self, AffiliatorIds},
  prelude::*,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
  pub name: String,
  #[serde(default)]
  pub affiliator_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroup {
  pub name: Option<String>,
  pub affiliator_ids: Option<Vec<String>>,
}

pub struct Group<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Group<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(
    &self,
    user_id: &str,
    input: CreateGroup,
  ) -> Result<broadcast_group::Model> {
    let now = Utc::now().naive_utc();

    let group = broadcast_group::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      user_id: Set(user_id.to_string()),
      name: Set(input.name),
      affiliator_ids: Set(AffiliatorIds(input.affiliator_ids)),
      created_at: Set(now),
      updated_at: Set(now),
    };

    Ok(group.insert(self.db).await?)
  }

  pub async fn all(&self, user_id: &str) -> Result<Vec<broadcast_group::Model>> {
    Ok(
      broadcast_group::Entity::find()
        .filter(broadcast_group::Column::UserId.eq(user_id))
        .order_by_desc(broadcast_group::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  pub async fn by_id(
    &self,
    user_id: &str,
    id: &str,
  ) -> Result<broadcast_group::Model> {
    broadcast_group::Entity::find_by_id(id)
      .filter(broadcast_group::Column::UserId.eq(user_id))
      .one(self.db)
      .await?
      .ok_or(Error::GroupNotFound)
  }

  pub async fn update(
    &self,
    user_id: &str,
    id: &str,
    patch: UpdateGroup,
  ) -> Result<broadcast_group::Model> {
    let group = self.by_id(user_id, id).await?;

    let mut model = broadcast_group::ActiveModel::from(group);
    if let Some(name) = patch.name {
      model.name = Set(name);
    }
    if let Some(ids) = patch.affiliator_ids {
      model.affiliator_ids = Set(AffiliatorIds(ids));
    }
    model.updated_at = Set(Utc::now().naive_utc());

    Ok(model.update(self.db).await?)
  }

  pub async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
    let group = self.by_id(user_id, id).await?;
    broadcast_group::Entity::delete_by_id(&group.id).exec(self.db).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  #[tokio::test]
  async fn test_group_crud_tenant_scoped() {
    let db = test_db::setup().await;
    let sv = Group::new(&db);

    let group = sv
      .create("u1", CreateGroup {
        name: "Top creators".into(),
        affiliator_ids: vec!["a1".into(), "a2".into()],
      })
      .await
      .unwrap();

    assert!(matches!(
      sv.by_id("u2", &group.id).await,
      Err(Error::GroupNotFound)
    ));

    let updated = sv
      .update("u1", &group.id, UpdateGroup {
        name: None,
        affiliator_ids: Some(vec!["a3".into()]),
      })
      .await
      .unwrap();
    assert_eq!(updated.affiliator_ids.0, vec!["a3".to_string()]);
    assert_eq!(updated.name, "Top creators");

    sv.delete("u1", &group.id).await.unwrap();
    assert!(sv.all("u1").await.unwrap().is_empty());
  }
}
