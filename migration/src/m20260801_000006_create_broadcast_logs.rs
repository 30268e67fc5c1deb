use sea_orm_migration::prelude::*;

use super::{
  m20260801_000001_create_users::Users,
  m20260801_000003_create_campaigns::Campaigns,
  m20260801_000004_create_affiliators::Affiliators,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(BroadcastLogs::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(BroadcastLogs::Id)
              .string()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(BroadcastLogs::UserId).string().not_null())
          .col(ColumnDef::new(BroadcastLogs::CampaignId).string().not_null())
          .col(
            ColumnDef::new(BroadcastLogs::AffiliatorId).string().not_null(),
          )
          .col(ColumnDef::new(BroadcastLogs::IsJoin).boolean().not_null())
          .col(
            ColumnDef::new(BroadcastLogs::JoinConfirmationDate)
              .date_time()
              .null(),
          )
          .col(
            ColumnDef::new(BroadcastLogs::ContentProgress)
              .integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(BroadcastLogs::AchievementStatus)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(BroadcastLogs::CreatedAt).date_time().not_null(),
          )
          .col(
            ColumnDef::new(BroadcastLogs::UpdatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_broadcast_logs_user")
              .from(BroadcastLogs::Table, BroadcastLogs::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_broadcast_logs_campaign")
              .from(BroadcastLogs::Table, BroadcastLogs::CampaignId)
              .to(Campaigns::Table, Campaigns::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_broadcast_logs_affiliator")
              .from(BroadcastLogs::Table, BroadcastLogs::AffiliatorId)
              .to(Affiliators::Table, Affiliators::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_broadcast_logs_campaign_affiliator")
          .table(BroadcastLogs::Table)
          .col(BroadcastLogs::CampaignId)
          .col(BroadcastLogs::AffiliatorId)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_broadcast_logs_user")
          .table(BroadcastLogs::Table)
          .col(BroadcastLogs::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(BroadcastLogs::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum BroadcastLogs {
  Table,
  Id,
  UserId,
  CampaignId,
  AffiliatorId,
  IsJoin,
  JoinConfirmationDate,
  ContentProgress,
  AchievementStatus,
  CreatedAt,
  UpdatedAt,
}
