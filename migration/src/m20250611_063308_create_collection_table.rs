use entity::collection;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(collection::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(collection::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(collection::Column::AdminId).integer().null())
                    .col(
                        ColumnDef::new(collection::Column::AdminName)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(collection::Column::Amount)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(collection::Column::Date).date().not_null())
                    .col(
                        ColumnDef::new(collection::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_collection_date")
                    .col(collection::Column::Date)
                    .table(collection::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("ix_collection_date").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(collection::Entity).to_owned())
            .await
    }
}
