use sea_orm_migration::prelude::*;

use super::m20260801_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(SampleRequests::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(SampleRequests::Id)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(SampleRequests::UserId).string().not_null())
          .col(ColumnDef::new(SampleRequests::CampaignId).string().null())
          .col(ColumnDef::new(SampleRequests::AffiliatorId).string().null())
          .col(ColumnDef::new(SampleRequests::RequestId).string().not_null())
          .col(
            ColumnDef::new(SampleRequests::ProductName).string().not_null(),
          )
          .col(ColumnDef::new(SampleRequests::Sku).string().not_null())
          .col(ColumnDef::new(SampleRequests::Qty).integer().not_null())
          .col(
            ColumnDef::new(SampleRequests::AffiliatorName)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(SampleRequests::AffiliatorUsername)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(SampleRequests::AffiliatorPhoneNumber)
              .string()
              .not_null(),
          )
          .col(ColumnDef::new(SampleRequests::Status).string().not_null())
          .col(ColumnDef::new(SampleRequests::Courier).string().not_null())
          .col(
            ColumnDef::new(SampleRequests::TrackingNumber)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(SampleRequests::RequestDate)
              .date_time()
              .not_null(),
          )
          .col(
            ColumnDef::new(SampleRequests::CreatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_sample_requests_user")
              .from(SampleRequests::Table, SampleRequests::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    // Dedup backstop for the sync reconciliation.
    manager
      .create_index(
        Index::create()
          .name("idx_sample_requests_user_request_sku")
          .table(SampleRequests::Table)
          .col(SampleRequests::UserId)
          .col(SampleRequests::RequestId)
          .col(SampleRequests::Sku)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_sample_requests_user")
          .table(SampleRequests::Table)
          .col(SampleRequests::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(SampleRequests::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum SampleRequests {
  Table,
  Id,
  UserId,
  CampaignId,
  AffiliatorId,
  RequestId,
  ProductName,
  Sku,
  Qty,
  AffiliatorName,
  AffiliatorUsername,
  AffiliatorPhoneNumber,
  Status,
  Courier,
  TrackingNumber,
  RequestDate,
  CreatedAt,
}
