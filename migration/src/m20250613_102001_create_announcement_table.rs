use entity::announcement;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(announcement::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(announcement::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(announcement::Column::Title)
                            .string_len(191)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(announcement::Column::Content)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(announcement::Column::Priority)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(announcement::Column::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(announcement::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(announcement::Entity).to_owned())
            .await
    }
}
