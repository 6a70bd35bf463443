use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// festival programme events

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub date: Date,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// "HH:MM", free text from the form
    pub time_start: Option<String>,
    pub time_end: Option<String>,

    pub location: Option<String>,

    pub organizer: Option<String>,

    /// 1..=5, lower is more urgent
    pub priority: i32,

    pub is_active: bool,

    /// recording admin
    pub created_by: i32,

    /// data create time
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
