use entity::admin;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(admin::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(admin::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(admin::Column::Name)
                    .string_len(120)
                    .not_null(),
            )
            .col(
                ColumnDef::new(admin::Column::Email)
                    .string_len(191)
                    .not_null(),
            )
            .col(
                ColumnDef::new(admin::Column::Password)
                    .string_len(255)
                    .not_null(),
            )
            .col(
                ColumnDef::new(admin::Column::Role)
                    .string_len(16)
                    .not_null()
                    .default("admin".to_owned()),
            )
            .col(
                ColumnDef::new(admin::Column::Status)
                    .string_len(16)
                    .not_null()
                    .default("pending".to_owned()),
            )
            .col(
                ColumnDef::new(admin::Column::CreatedAt)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(admin::Column::UpdatedAt)
                    .big_integer()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_admin_email")
                    .col(admin::Column::Email)
                    .table(admin::Entity)
                    .unique()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uq_admin_email").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(admin::Entity).to_owned())
            .await
    }
}
