use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// donations

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub person_name: String,

    pub amount: f64,

    pub payment_method: String,

    /// recording admin, denormalized for display
    pub admin_id: i32,
    pub admin_name: String,

    pub donor_name: Option<String>,

    pub donor_phone: Option<String>,

    /// in-kind contribution description
    #[sea_orm(column_type = "Text", nullable)]
    pub items_donated: Option<String>,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
