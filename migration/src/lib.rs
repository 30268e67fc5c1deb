pub use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_sessions;
mod m20260801_000003_create_campaigns;
mod m20260801_000004_create_affiliators;
mod m20260801_000005_create_broadcast_groups;
mod m20260801_000006_create_broadcast_logs;
mod m20260801_000007_create_broadcast_messages;
mod m20260801_000008_create_sample_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260801_000001_create_users::Migration),
      Box::new(m20260801_000002_create_sessions::Migration),
      Box::new(m20260801_000003_create_campaigns::Migration),
      Box::new(m20260801_000004_create_affiliators::Migration),
      Box::new(m20260801_000005_create_broadcast_groups::Migration),
      Box::new(m20260801_000006_create_broadcast_logs::Migration),
      Box::new(m20260801_000007_create_broadcast_messages::Migration),
      Box::new(m20260801_000008_create_sample_requests::Migration),
    ]
  }
}
