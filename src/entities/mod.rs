//! SeaORM entities for the attendance schema (see `sql/schema.sql`).

pub mod prelude;

pub mod daily_statistics;
pub mod entries;
pub mod exits;
pub mod shift_parameters;
