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
          .table(Campaigns::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Campaigns::Id).string().not_null().primary_key(),
          )
          .col(ColumnDef::new(Campaigns::UserId).string().not_null())
          .col(ColumnDef::new(Campaigns::Name).string().not_null())
          .col(ColumnDef::new(Campaigns::ProductName).string().not_null())
          .col(ColumnDef::new(Campaigns::SkuArray).json().not_null())
          .col(ColumnDef::new(Campaigns::LinkSample).string().not_null())
          .col(ColumnDef::new(Campaigns::ProductQty).integer().not_null())
          .col(ColumnDef::new(Campaigns::Brief).text().not_null())
          .col(ColumnDef::new(Campaigns::VideoQty).integer().not_null())
          .col(ColumnDef::new(Campaigns::JoinMessage).string().not_null())
          .col(ColumnDef::new(Campaigns::StartDate).date_time().not_null())
          .col(ColumnDef::new(Campaigns::EndDate).date_time().not_null())
          .col(ColumnDef::new(Campaigns::Status).string().not_null())
          .col(ColumnDef::new(Campaigns::AutoMessages).json().not_null())
          .col(
            ColumnDef::new(Campaigns::AffiliatorCount).integer().not_null(),
          )
          .col(
            ColumnDef::new(Campaigns::SampleSentCount).integer().not_null(),
          )
          .col(ColumnDef::new(Campaigns::VideoCount).integer().not_null())
          .col(ColumnDef::new(Campaigns::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Campaigns::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_campaigns_user")
              .from(Campaigns::Table, Campaigns::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_campaigns_user")
          .table(Campaigns::Table)
          .col(Campaigns::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Campaigns::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Campaigns {
  Table,
  Id,
  UserId,
  Name,
  ProductName,
  SkuArray,
  LinkSample,
  ProductQty,
  Brief,
  VideoQty,
  JoinMessage,
  StartDate,
  EndDate,
  Status,
  AutoMessages,
  AffiliatorCount,
  SampleSentCount,
  VideoCount,
  CreatedAt,
  UpdatedAt,
}
