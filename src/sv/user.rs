use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  entity::{
    SubscriptionStatus, UserRole, UserTier, broadcast_message, session, user,
  },
  prelude::*,
  sv::auth,
};

/// Per-tier quota limits: (broadcast, tracking, content).
fn quota_for(tier: UserTier) -> (i64, i64, i64) {
  match tier {
    UserTier::Starter => (10_000, 350, 2_500),
    UserTier::Growth => (30_000, 750, 5_000),
    UserTier::Scale => (100_000, 2_500, 15_000),
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub phone_number: String,
  pub tier: UserTier,
  pub expiry_date: Option<chrono::DateTime<Utc>>,
}

/// Returned once at creation time; the raw password is never stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
  pub user: user::Model,
  pub raw_password: String,
  pub license_key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
  pub name: Option<String>,
  pub phone_number: Option<String>,
  pub image: Option<String>,
  pub role: Option<UserRole>,
  pub tier: Option<UserTier>,
  pub subscription_status: Option<SubscriptionStatus>,
  pub expiry_date: Option<chrono::DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
  pub subscription: SubscriptionInfo,
  pub quota: QuotaView,
  pub history: HistoryView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInfo {
  pub tier: UserTier,
  pub status: SubscriptionStatus,
  pub start_date: DateTime,
  pub expiry_date: Option<DateTime>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaView {
  pub broadcast_limit: i64,
  pub broadcast_used: i64,
  pub remaining_broadcast: i64,
  pub tracking_limit: i64,
  pub tracking_used: i64,
  pub remaining_tracking: i64,
  pub content_limit: i64,
  pub content_used: i64,
  pub remaining_content: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
  pub broadcast_used: i64,
  pub tracking_used: i64,
  pub content_used: i64,
}

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Creates a user with a generated password and license key, quota
  /// derived from the tier, and the singleton broadcast message row.
  pub async fn create(&self, input: NewUser) -> Result<CreatedUser> {
    let existing = user::Entity::find()
      .filter(user::Column::Email.eq(&input.email))
      .one(self.db)
      .await?;

    if existing.is_some() {
      return Err(Error::InvalidArgs(format!(
        "User with email {} already exists",
        input.email
      )));
    }

    let mut bytes = [0u8; 8];
    rand::rng().fill_bytes(&mut bytes);
    let raw_password = hex::encode(bytes);

    let license_key = Uuid::new_v4().to_string();
    let (broadcast_limit, tracking_limit, content_limit) =
      quota_for(input.tier);
    let now = Utc::now().naive_utc();

    let user = user::ActiveModel {
      id: Set(Uuid::new_v4().to_string()),
      name: Set(input.name),
      email: Set(input.email),
      email_verified: Set(false),
      phone_number: Set(Some(input.phone_number)),
      image: Set(None),
      password_hash: Set(auth::hash_password(&raw_password)?),
      role: Set(UserRole::User),
      tier: Set(input.tier),
      subscription_status: Set(SubscriptionStatus::Active),
      subscription_start: Set(now),
      subscription_expiry: Set(input.expiry_date.map(|d| d.naive_utc())),
      broadcast_limit: Set(broadcast_limit),
      broadcast_used: Set(0),
      tracking_limit: Set(tracking_limit),
      tracking_used: Set(0),
      content_limit: Set(content_limit),
      content_used: Set(0),
      history_broadcast_used: Set(0),
      history_tracking_used: Set(0),
      history_content_used: Set(0),
      license_key: Set(Some(license_key.clone())),
      created_at: Set(now),
      updated_at: Set(now),
    }
    .insert(self.db)
    .await?;

    broadcast_message::ActiveModel {
      user_id: Set(user.id.clone()),
      campaign_id: Set(None),
      broadcast_group_id: Set(None),
      achievement_status_filter: Set(None),
      message: Set(String::new()),
      message_type: Set(Default::default()),
      status: Set(Default::default()),
      started_at: Set(None),
      completed_at: Set(None),
      created_at: Set(now),
      updated_at: Set(now),
    }
    .insert(self.db)
    .await?;

    Ok(CreatedUser { user, raw_password, license_key })
  }

  pub async fn all(&self) -> Result<Vec<user::Model>> {
    Ok(
      user::Entity::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(self.db)
        .await?,
    )
  }

  pub async fn by_id(&self, id: &str) -> Result<user::Model> {
    user::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)
  }

  pub async fn by_license_key(&self, key: &str) -> Result<user::Model> {
    user::Entity::find()
      .filter(user::Column::LicenseKey.eq(key))
      .one(self.db)
      .await?
      .ok_or(Error::InvalidLicense)
  }

  pub async fn update(&self, id: &str, patch: UserPatch) -> Result<user::Model> {
    let user = self.by_id(id).await?;

    let mut model = user::ActiveModel::from(user);
    if let Some(name) = patch.name {
      model.name = Set(name);
    }
    if let Some(phone) = patch.phone_number {
      model.phone_number = Set(Some(phone));
    }
    if let Some(image) = patch.image {
      model.image = Set(Some(image));
    }
    if let Some(role) = patch.role {
      model.role = Set(role);
    }
    if let Some(tier) = patch.tier {
      model.tier = Set(tier);
    }
    if let Some(status) = patch.subscription_status {
      model.subscription_status = Set(status);
    }
    if let Some(expiry) = patch.expiry_date {
      model.subscription_expiry = Set(Some(expiry.naive_utc()));
    }
    model.updated_at = Set(Utc::now().naive_utc());

    Ok(model.update(self.db).await?)
  }

  pub async fn update_profile(
    &self,
    id: &str,
    name: Option<String>,
    phone_number: Option<String>,
  ) -> Result<user::Model> {
    let user = self.by_id(id).await?;

    let mut model = user::ActiveModel::from(user);
    if let Some(name) = name {
      model.name = Set(name);
    }
    if let Some(phone) = phone_number {
      model.phone_number = Set(Some(phone));
    }
    model.updated_at = Set(Utc::now().naive_utc());

    Ok(model.update(self.db).await?)
  }

  pub async fn change_password(
    &self,
    user: &user::Model,
    current: &str,
    new: &str,
  ) -> Result<()> {
    if !auth::verify_password(&user.password_hash, current) {
      return Err(Error::InvalidArgs("Current password is incorrect".into()));
    }

    user::ActiveModel {
      password_hash: Set(auth::hash_password(new)?),
      updated_at: Set(Utc::now().naive_utc()),
      ..user.clone().into()
    }
    .update(self.db)
    .await?;

    Ok(())
  }

  pub async fn regenerate_license(&self, id: &str) -> Result<String> {
    let user = self.by_id(id).await?;
    let key = Uuid::new_v4().to_string();

    user::ActiveModel {
      license_key: Set(Some(key.clone())),
      updated_at: Set(Utc::now().naive_utc()),
      ..user.into()
    }
    .update(self.db)
    .await?;

    Ok(key)
  }

  /// Removes the user plus their sessions and broadcast message singleton.
  pub async fn delete(&self, id: &str) -> Result<()> {
    let user = self.by_id(id).await?;

    session::Entity::delete_many()
      .filter(session::Column::UserId.eq(&user.id))
      .exec(self.db)
      .await?;
    broadcast_message::Entity::delete_by_id(&user.id).exec(self.db).await?;
    user::Entity::delete_by_id(&user.id).exec(self.db).await?;

    Ok(())
  }

  pub fn subscription_view(user: &user::Model) -> SubscriptionView {
    SubscriptionView {
      subscription: SubscriptionInfo {
        tier: user.tier,
        status: user.subscription_status,
        start_date: user.subscription_start,
        expiry_date: user.subscription_expiry,
      },
      quota: QuotaView {
        broadcast_limit: user.broadcast_limit,
        broadcast_used: user.broadcast_used,
        remaining_broadcast: user.broadcast_limit - user.broadcast_used,
        tracking_limit: user.tracking_limit,
        tracking_used: user.tracking_used,
        remaining_tracking: user.tracking_limit - user.tracking_used,
        content_limit: user.content_limit,
        content_used: user.content_used,
        remaining_content: user.content_limit - user.content_used,
      },
      history: HistoryView {
        broadcast_used: user.history_broadcast_used,
        tracking_used: user.history_tracking_used,
        content_used: user.history_content_used,
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  fn input(email: &str, tier: UserTier) -> NewUser {
    NewUser {
      name: "Seller".into(),
      email: email.into(),
      phone_number: "628123456789".into(),
      tier,
      expiry_date: None,
    }
  }

  #[tokio::test]
  async fn test_create_user_quota_and_singleton() {
    let db = test_db::setup().await;
    let sv = User::new(&db);

    let created =
      sv.create(input("growth@example.com", UserTier::Growth)).await.unwrap();

    assert_eq!(created.user.broadcast_limit, 30_000);
    assert_eq!(created.user.tracking_limit, 750);
    assert_eq!(created.user.content_limit, 5_000);
    assert!(auth::verify_password(
      &created.user.password_hash,
      &created.raw_password
    ));

    let singleton =
      broadcast_message::Entity::find_by_id(&created.user.id)
        .one(&db)
        .await
        .unwrap();
    assert!(singleton.is_some());
  }

  #[tokio::test]
  async fn test_duplicate_email_rejected() {
    let db = test_db::setup().await;
    let sv = User::new(&db);

    sv.create(input("dup@example.com", UserTier::Starter)).await.unwrap();
    let result =
      sv.create(input("dup@example.com", UserTier::Starter)).await;

    assert!(matches!(result, Err(Error::InvalidArgs(_))));
  }

  #[tokio::test]
  async fn test_regenerate_license() {
    let db = test_db::setup().await;
    let sv = User::new(&db);

    let created =
      sv.create(input("key@example.com", UserTier::Starter)).await.unwrap();
    let new_key = sv.regenerate_license(&created.user.id).await.unwrap();

    assert_ne!(new_key, created.license_key);
    let found = sv.by_license_key(&new_key).await.unwrap();
    assert_eq!(found.id, created.user.id);
    assert!(matches!(
      sv.by_license_key(&created.license_key).await,
      Err(Error::InvalidLicense)
    ));
  }

  #[tokio::test]
  async fn test_delete_removes_singleton() {
    let db = test_db::setup().await;
    let sv = User::new(&db);

    let created =
      sv.create(input("gone@example.com", UserTier::Scale)).await.unwrap();
    sv.delete(&created.user.id).await.unwrap();

    assert!(matches!(
      sv.by_id(&created.user.id).await,
      Err(Error::UserNotFound)
    ));
    let singleton = broadcast_message::Entity::find_by_id(&created.user.id)
      .one(&db)
      .await
      .unwrap();
    assert!(singleton.is_none());
  }
}
