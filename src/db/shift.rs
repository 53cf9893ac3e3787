//! Shift parameter repository.

use crate::entities::{prelude::*, shift_parameters};
use crate::error::{AppError, Result as AppResult};
use crate::models::{NewShiftParameters, ShiftParameters as ShiftParams, parse_time_of_day};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;

/// Get the active parameter set, newest first if the invariant was ever broken.
pub async fn get_active<C>(db: &C) -> Result<Option<shift_parameters::Model>, DbErr>
where
    C: ConnectionTrait,
{
    ShiftParameters::find()
        .filter(shift_parameters::Column::Active.eq(true))
        .order_by_desc(shift_parameters::Column::CreatedAt)
        .one(db)
        .await
}

/// Deactivate all active sets and insert a new active one in a single transaction.
pub async fn activate(db: &DatabaseConnection, data: &NewShiftParameters) -> Result<shift_parameters::Model, DbErr> {
    let txn = db.begin().await?;

    ShiftParameters::update_many()
        .col_expr(shift_parameters::Column::Active, Expr::value(false))
        .filter(shift_parameters::Column::Active.eq(true))
        .exec(&txn)
        .await?;

    let model = shift_parameters::ActiveModel {
        expected_start: Set(data.expected_start.format("%H:%M").to_string()),
        expected_end: Set(data.expected_end.format("%H:%M").to_string()),
        tolerance_minutes: Set(data.tolerance_minutes),
        required_hours: Set(data.required_hours),
        min_lunch_minutes: Set(data.min_lunch_minutes),
        active: Set(true),
        ..Default::default()
    };
    let created = model.insert(&txn).await?;

    txn.commit().await?;
    Ok(created)
}

/// Convert a stored row, parsing its `HH:MM` columns.
pub fn to_domain(model: shift_parameters::Model) -> AppResult<ShiftParams> {
    let expected_start = parse_time_of_day(&model.expected_start).ok_or_else(|| {
        AppError::parse(format!(
            "Shift parameters {} have invalid start time '{}'",
            model.id, model.expected_start
        ))
    })?;
    let expected_end = parse_time_of_day(&model.expected_end).ok_or_else(|| {
        AppError::parse(format!(
            "Shift parameters {} have invalid end time '{}'",
            model.id, model.expected_end
        ))
    })?;

    Ok(ShiftParams {
        id: model.id,
        expected_start,
        expected_end,
        tolerance_minutes: model.tolerance_minutes,
        required_hours: model.required_hours,
        min_lunch_minutes: model.min_lunch_minutes,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
