use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// door-to-door cash collected by an admin, outside member payments

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// absent on rows imported from paper records
    pub admin_id: Option<i32>,
    pub admin_name: String,

    pub amount: f64,

    pub date: Date,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
