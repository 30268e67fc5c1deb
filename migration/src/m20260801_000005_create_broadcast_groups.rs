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
          .table(BroadcastGroups::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(BroadcastGroups::Id)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(BroadcastGroups::UserId).string().not_null())
          .col(ColumnDef::new(BroadcastGroups::Name).string().not_null())
          .col(
            ColumnDef::new(BroadcastGroups::AffiliatorIds).json().not_null(),
          )
          .col(
            ColumnDef::new(BroadcastGroups::CreatedAt).date_time().not_null(),
          )
          .col(
            ColumnDef::new(BroadcastGroups::UpdatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_broadcast_groups_user")
              .from(BroadcastGroups::Table, BroadcastGroups::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_broadcast_groups_user")
          .table(BroadcastGroups::Table)
          .col(BroadcastGroups::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(BroadcastGroups::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum BroadcastGroups {
  Table,
  Id,
  UserId,
  Name,
  AffiliatorIds,
  CreatedAt,
  UpdatedAt,
}
