use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// per-admin running totals, bumped in the same transaction
/// as the collection or expense row

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub admin_id: i32,
    pub admin_name: String,

    pub collected_total: f64,
    pub collected_count: i64,

    pub expense_total: f64,
    pub expense_count: i64,

    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
