use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// rotating notices shown on the public page

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// 1..=5, lower is more urgent
    pub priority: i32,

    pub is_active: bool,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
