use entity::schedule;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(schedule::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(schedule::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(schedule::Column::Date).date().not_null())
            .col(
                ColumnDef::new(schedule::Column::Title)
                    .string_len(191)
                    .not_null(),
            )
            .col(ColumnDef::new(schedule::Column::Description).text().null())
            .col(
                ColumnDef::new(schedule::Column::TimeStart)
                    .string_len(16)
                    .null(),
            )
            .col(
                ColumnDef::new(schedule::Column::TimeEnd)
                    .string_len(16)
                    .null(),
            )
            .col(
                ColumnDef::new(schedule::Column::Location)
                    .string_len(191)
                    .null(),
            )
            .col(
                ColumnDef::new(schedule::Column::Organizer)
                    .string_len(120)
                    .null(),
            )
            .col(
                ColumnDef::new(schedule::Column::Priority)
                    .integer()
                    .not_null()
                    .default(3),
            )
            .col(
                ColumnDef::new(schedule::Column::IsActive)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(
                ColumnDef::new(schedule::Column::CreatedBy)
                    .integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(schedule::Column::CreatedAt)
                    .big_integer()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_schedule_date")
                    .col(schedule::Column::Date)
                    .table(schedule::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("ix_schedule_date").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(schedule::Entity).to_owned())
            .await
    }
}
