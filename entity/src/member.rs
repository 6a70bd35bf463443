use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// member payments, one row per contributing person

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub address: String,

    pub phone: String,

    pub amount_paid: f64,

    pub payment_method: String,

    /// recording admin, denormalized for display
    pub admin_id: i32,
    pub admin_name: String,

    /// display rank, lower shows first
    pub priority_order: i32,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
