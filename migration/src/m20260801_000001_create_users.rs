use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
          .col(ColumnDef::new(Users::Name).string().not_null())
          .col(ColumnDef::new(Users::Email).string().not_null())
          .col(ColumnDef::new(Users::EmailVerified).boolean().not_null())
          .col(ColumnDef::new(Users::PhoneNumber).string().null())
          .col(ColumnDef::new(Users::Image).string().null())
          .col(ColumnDef::new(Users::PasswordHash).string().not_null())
          .col(ColumnDef::new(Users::Role).string().not_null())
          .col(ColumnDef::new(Users::Tier).string().not_null())
          .col(ColumnDef::new(Users::SubscriptionStatus).string().not_null())
          .col(
            ColumnDef::new(Users::SubscriptionStart).date_time().not_null(),
          )
          .col(ColumnDef::new(Users::SubscriptionExpiry).date_time().null())
          .col(
            ColumnDef::new(Users::BroadcastLimit).big_integer().not_null(),
          )
          .col(ColumnDef::new(Users::BroadcastUsed).big_integer().not_null())
          .col(ColumnDef::new(Users::TrackingLimit).big_integer().not_null())
          .col(ColumnDef::new(Users::TrackingUsed).big_integer().not_null())
          .col(ColumnDef::new(Users::ContentLimit).big_integer().not_null())
          .col(ColumnDef::new(Users::ContentUsed).big_integer().not_null())
          .col(
            ColumnDef::new(Users::HistoryBroadcastUsed)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(Users::HistoryTrackingUsed)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(Users::HistoryContentUsed)
              .big_integer()
              .not_null(),
          )
          .col(ColumnDef::new(Users::LicenseKey).string().null())
          .col(ColumnDef::new(Users::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Users::UpdatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_users_email")
          .table(Users::Table)
          .col(Users::Email)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_users_license_key")
          .table(Users::Table)
          .col(Users::LicenseKey)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Users {
  Table,
  Id,
  Name,
  Email,
  EmailVerified,
  PhoneNumber,
  Image,
  PasswordHash,
  Role,
  Tier,
  SubscriptionStatus,
  SubscriptionStart,
  SubscriptionExpiry,
  BroadcastLimit,
  BroadcastUsed,
  TrackingLimit,
  TrackingUsed,
  ContentLimit,
  ContentUsed,
  HistoryBroadcastUsed,
  HistoryTrackingUsed,
  HistoryContentUsed,
  LicenseKey,
  CreatedAt,
  UpdatedAt,
}
