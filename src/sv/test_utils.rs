//! Shared test utilities for database setup

#[cfg(test)]
pub mod test_db {
  use chrono::Utc;
  use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    Schema, Set,
  };

  use crate::entity::*;

  /// Creates an in-memory SQLite database with all required tables
  pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let schema = Schema::new(DbBackend::Sqlite);

    let stmt = schema.create_table_from_entity(user::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(session::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(campaign::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(affiliator::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(broadcast_group::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(broadcast_log::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(broadcast_message::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    let stmt = schema.create_table_from_entity(sample_request::Entity);
    db.execute(db.get_database_backend().build(&stmt)).await.unwrap();

    // Tenant users referenced by fixtures across the service tests; the
    // entity tables carry the same foreign keys as the migrations, so the
    // rows must exist before any tenant-scoped data is seeded.
    seed_tenant(&db, "u1").await;
    seed_tenant(&db, "u2").await;

    db
  }

  async fn seed_tenant(db: &DatabaseConnection, id: &str) {
    let now = Utc::now().naive_utc();
    user::ActiveModel {
      id: Set(id.into()),
      name: Set(format!("Tenant {id}")),
      email: Set(format!("{id}@example.com")),
      email_verified: Set(true),
      phone_number: Set(None),
      image: Set(None),
      password_hash: Set(String::new()),
      role: Set(UserRole::User),
      tier: Set(UserTier::Starter),
      subscription_status: Set(SubscriptionStatus::Active),
      subscription_start: Set(now),
      subscription_expiry: Set(None),
      broadcast_limit: Set(0),
      broadcast_used: Set(0),
      tracking_limit: Set(0),
      tracking_used: Set(0),
      content_limit: Set(0),
      content_used: Set(0),
      history_broadcast_used: Set(0),
      history_tracking_used: Set(0),
      history_content_used: Set(0),
      license_key: Set(None),
      created_at: Set(now),
      updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap();
  }
}
