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
          .table(Affiliators::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Affiliators::Id).string().not_null().primary_key(),
          )
          .col(ColumnDef::new(Affiliators::UserId).string().not_null())
          .col(
            ColumnDef::new(Affiliators::TiktokUsername).string().not_null(),
          )
          .col(ColumnDef::new(Affiliators::Name).string().not_null())
          .col(ColumnDef::new(Affiliators::PhoneNumber).string().not_null())
          .col(ColumnDef::new(Affiliators::QualityScore).integer().not_null())
          .col(
            ColumnDef::new(Affiliators::TotalCampaigns).integer().not_null(),
          )
          .col(ColumnDef::new(Affiliators::Notes).string().not_null())
          .col(ColumnDef::new(Affiliators::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Affiliators::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_affiliators_user")
              .from(Affiliators::Table, Affiliators::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_affiliators_user_username")
          .table(Affiliators::Table)
          .col(Affiliators::UserId)
          .col(Affiliators::TiktokUsername)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Affiliators::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Affiliators {
  Table,
  Id,
  UserId,
  TiktokUsername,
  Name,
  PhoneNumber,
  QualityScore,
  TotalCampaigns,
  Notes,
  CreatedAt,
  UpdatedAt,
}
