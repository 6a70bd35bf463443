use entity::donation;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(donation::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(donation::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PersonName)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::Amount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(donation::Column::PaymentMethod)
                            .string_len(50)
                            .not_null()
                            .default("".to_owned()),
                    )
                    .col(
                        ColumnDef::new(donation::Column::AdminId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::AdminName)
                            .string_len(120)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::DonorName)
                            .string_len(120)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(donation::Column::DonorPhone)
                            .string_len(20)
                            .null(),
                    )
                    .col(ColumnDef::new(donation::Column::ItemsDonated).text().null())
                    .col(
                        ColumnDef::new(donation::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(donation::Entity).to_owned())
            .await
    }
}
