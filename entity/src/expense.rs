use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// festival spending

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// absent on rows imported from paper records
    pub admin_id: Option<i32>,
    pub admin_name: String,

    pub amount: f64,

    #[sea_orm(column_type = "Text")]
    pub purpose: String,

    pub date: Date,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
