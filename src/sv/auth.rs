use argon2::{
  Argon2,
  password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
  },
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  entity::{UserRole, session, user},
  prelude::*,
};

/// Cookie sessions and extension bearer tokens both live for a week.
pub const SESSION_TTL_DAYS: i64 = 7;

pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
  PasswordHash::new(hash)
    .map(|parsed| {
      Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    })
    .unwrap_or(false)
}

/// Claims carried by the extension bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtensionClaims {
  pub sub: String,
  pub email: String,
  pub role: UserRole,
  pub exp: i64,
}

pub fn issue_extension_token(
  user: &user::Model,
  secret: &str,
) -> Result<String> {
  let exp = (Utc::now() + TimeDelta::days(SESSION_TTL_DAYS)).timestamp();
  let claims = ExtensionClaims {
    sub: user.id.clone(),
    email: user.email.clone(),
    role: user.role,
    exp,
  };

  jsonwebtoken::encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(secret.as_bytes()),
  )
  .map_err(|e| Error::Internal(format!("Failed to sign token: {e}")))
}

pub fn verify_extension_token(
  token: &str,
  secret: &str,
) -> Result<ExtensionClaims> {
  jsonwebtoken::decode::<ExtensionClaims>(
    token,
    &DecodingKey::from_secret(secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|_| Error::Unauthorized)
}

pub struct Auth<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Auth<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn login(
    &self,
    email: &str,
    password: &str,
  ) -> Result<(user::Model, session::Model)> {
    let user = user::Entity::find()
      .filter(user::Column::Email.eq(email))
      .one(self.db)
      .await?
      .ok_or(Error::Unauthorized)?;

    if !verify_password(&user.password_hash, password) {
      return Err(Error::Unauthorized);
    }

    let session = self.create_session(&user.id).await?;
    Ok((user, session))
  }

  pub async fn create_session(&self, user_id: &str) -> Result<session::Model> {
    let now = Utc::now().naive_utc();
    let expires_at = now + TimeDelta::days(SESSION_TTL_DAYS);

    let session = session::ActiveModel {
      token: Set(Uuid::new_v4().to_string()),
      user_id: Set(user_id.to_string()),
      created_at: Set(now),
      expires_at: Set(expires_at),
    };

    Ok(session.insert(self.db).await?)
  }

  /// Resolves a session cookie to its user; expired sessions are removed
  /// on sight.
  pub async fn resolve(&self, token: &str) -> Result<user::Model> {
    let session = session::Entity::find_by_id(token)
      .one(self.db)
      .await?
      .ok_or(Error::Unauthorized)?;

    if session.expires_at < Utc::now().naive_utc() {
      session::Entity::delete_by_id(token).exec(self.db).await?;
      return Err(Error::Unauthorized);
    }

    user::Entity::find_by_id(&session.user_id)
      .one(self.db)
      .await?
      .ok_or(Error::Unauthorized)
  }

  pub async fn logout(&self, token: &str) -> Result<()> {
    session::Entity::delete_by_id(token).exec(self.db).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::{
    test_utils::test_db,
    user::{NewUser, User},
  };
  use crate::entity::UserTier;

  async fn seed_user(db: &DatabaseConnection) -> (user::Model, String) {
    let created = User::new(db)
      .create(NewUser {
        name: "Test".into(),
        email: "test@example.com".into(),
        phone_number: "628123456789".into(),
        tier: UserTier::Starter,
        expiry_date: None,
      })
      .await
      .unwrap();
    (created.user, created.raw_password)
  }

  #[tokio::test]
  async fn test_login_creates_session() {
    let db = test_db::setup().await;
    let (user, password) = seed_user(&db).await;

    let sv = Auth::new(&db);
    let (logged_in, session) =
      sv.login("test@example.com", &password).await.unwrap();

    assert_eq!(logged_in.id, user.id);
    assert_eq!(session.user_id, user.id);

    let resolved = sv.resolve(&session.token).await.unwrap();
    assert_eq!(resolved.id, user.id);
  }

  #[tokio::test]
  async fn test_login_rejects_bad_password() {
    let db = test_db::setup().await;
    seed_user(&db).await;

    let result = Auth::new(&db).login("test@example.com", "wrong").await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn test_expired_session_rejected() {
    let db = test_db::setup().await;
    let (user, _) = seed_user(&db).await;

    let past = Utc::now().naive_utc() - TimeDelta::days(1);
    let session = session::ActiveModel {
      token: Set("stale".into()),
      user_id: Set(user.id.clone()),
      created_at: Set(past - TimeDelta::days(7)),
      expires_at: Set(past),
    };
    session.insert(&db).await.unwrap();

    let result = Auth::new(&db).resolve("stale").await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn test_extension_token_roundtrip() {
    let db = test_db::setup().await;
    let (user, _) = seed_user(&db).await;

    let token = issue_extension_token(&user, "secret").unwrap();
    let claims = verify_extension_token(&token, "secret").unwrap();

    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.email, user.email);

    assert!(matches!(
      verify_extension_token(&token, "other-secret"),
      Err(Error::Unauthorized)
    ));
  }
}
