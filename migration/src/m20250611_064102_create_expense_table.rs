use entity::expense;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(expense::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(expense::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(expense::Column::AdminId).integer().null())
                    .col(
                        ColumnDef::new(expense::Column::AdminName)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(ColumnDef::new(expense::Column::Amount).double().not_null())
                    .col(ColumnDef::new(expense::Column::Purpose).text().not_null())
                    .col(ColumnDef::new(expense::Column::Date).date().not_null())
                    .col(
                        ColumnDef::new(expense::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(expense::Entity).to_owned())
            .await
    }
}
