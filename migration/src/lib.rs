pub use sea_orm_migration::prelude::*;

mod m20250610_083015_create_admin_table;
mod m20250610_091347_create_member_table;
mod m20250611_052210_create_donation_table;
mod m20250611_063308_create_collection_table;
mod m20250611_064102_create_expense_table;
mod m20250613_101544_create_schedule_table;
mod m20250613_102001_create_announcement_table;
mod m20250618_071133_create_stat_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250610_083015_create_admin_table::Migration),
            Box::new(m20250610_091347_create_member_table::Migration),
            Box::new(m20250611_052210_create_donation_table::Migration),
            Box::new(m20250611_063308_create_collection_table::Migration),
            Box::new(m20250611_064102_create_expense_table::Migration),
            Box::new(m20250613_101544_create_schedule_table::Migration),
            Box::new(m20250613_102001_create_announcement_table::Migration),
            Box::new(m20250618_071133_create_stat_table::Migration),
        ]
    }
}
