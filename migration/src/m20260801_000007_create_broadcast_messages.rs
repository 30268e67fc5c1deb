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
          .table(BroadcastMessages::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(BroadcastMessages::UserId)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(BroadcastMessages::CampaignId).string().null())
          .col(
            ColumnDef::new(BroadcastMessages::BroadcastGroupId)
              .string()
              .null(),
          )
          .col(
            ColumnDef::new(BroadcastMessages::AchievementStatusFilter)
              .string()
              .null(),
          )
          .col(ColumnDef::new(BroadcastMessages::Message).text().not_null())
          .col(
            ColumnDef::new(BroadcastMessages::MessageType)
              .string()
              .not_null(),
          )
          .col(ColumnDef::new(BroadcastMessages::Status).string().not_null())
          .col(ColumnDef::new(BroadcastMessages::StartedAt).date_time().null())
          .col(
            ColumnDef::new(BroadcastMessages::CompletedAt).date_time().null(),
          )
          .col(
            ColumnDef::new(BroadcastMessages::CreatedAt)
              .date_time()
              .not_null(),
          )
          .col(
            ColumnDef::new(BroadcastMessages::UpdatedAt)
              .date_time()
              .not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_broadcast_messages_user")
              .from(BroadcastMessages::Table, BroadcastMessages::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(BroadcastMessages::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum BroadcastMessages {
  Table,
  UserId,
  CampaignId,
  BroadcastGroupId,
  AchievementStatusFilter,
  Message,
  MessageType,
  Status,
  StartedAt,
  CompletedAt,
  CreatedAt,
  UpdatedAt,
}
