use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shift_parameters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub expected_start: String,
    pub expected_end: String,
    pub tolerance_minutes: i32,
    #[sea_orm(column_type = "Double")]
    pub required_hours: f64,
    pub min_lunch_minutes: i32,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
