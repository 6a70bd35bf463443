use entity::stat;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(stat::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(stat::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(stat::Column::AdminId).integer().not_null())
            .col(
                ColumnDef::new(stat::Column::AdminName)
                    .string_len(120)
                    .not_null(),
            )
            .col(
                ColumnDef::new(stat::Column::CollectedTotal)
                    .double()
                    .not_null()
                    .default(0.0),
            )
            .col(
                ColumnDef::new(stat::Column::CollectedCount)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(stat::Column::ExpenseTotal)
                    .double()
                    .not_null()
                    .default(0.0),
            )
            .col(
                ColumnDef::new(stat::Column::ExpenseCount)
                    .big_integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(stat::Column::UpdatedAt)
                    .big_integer()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_stat_admin_id")
                    .col(stat::Column::AdminId)
                    .table(stat::Entity)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_stat_admin_id").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(stat::Entity).to_owned())
            .await
    }
}
