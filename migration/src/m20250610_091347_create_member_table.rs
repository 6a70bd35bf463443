use entity::member;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(member::Entity)
            .if_not_exists()
            .col(
                ColumnDef::new(member::Column::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(member::Column::Name)
                    .string_len(120)
                    .not_null(),
            )
            .col(
                ColumnDef::new(member::Column::Address)
                    .text()
                    .not_null()
                    .default("".to_owned()),
            )
            .col(
                ColumnDef::new(member::Column::Phone)
                    .string_len(20)
                    .not_null()
                    .default("".to_owned()),
            )
            .col(
                ColumnDef::new(member::Column::AmountPaid)
                    .double()
                    .not_null()
                    .default(0.0),
            )
            .col(
                ColumnDef::new(member::Column::PaymentMethod)
                    .string_len(50)
                    .not_null()
                    .default("".to_owned()),
            )
            .col(
                ColumnDef::new(member::Column::AdminId)
                    .integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(member::Column::AdminName)
                    .string_len(120)
                    .not_null(),
            )
            .col(
                ColumnDef::new(member::Column::PriorityOrder)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .col(
                ColumnDef::new(member::Column::CreatedAt)
                    .big_integer()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_member_priority_order")
                    .col(member::Column::PriorityOrder)
                    .table(member::Entity)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("ix_member_priority_order").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(member::Entity).to_owned())
            .await
    }
}
