//! Entry, exit and daily statistics repository.
//!
//! Functions are generic over the connection so they compose inside a
//! transaction.

use crate::entities::{daily_statistics, entries, exits, prelude::*};
use crate::models::{DailyStatistics as DailyStatisticsRow, EntryRecord, ExitRecord};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;

/// Insert an entry, skipping it if the employee already has one that day.
///
/// Relies on the `(employee_id, entry_date)` unique constraint; returns None
/// on conflict.
pub async fn insert_entry<C>(db: &C, employee_id: i32, at: NaiveDateTime) -> Result<Option<entries::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let model = entries::ActiveModel {
        employee_id: Set(employee_id),
        entry_date: Set(at.date()),
        entry_at: Set(at),
        ..Default::default()
    };

    let result = Entries::insert(model)
        .on_conflict(
            OnConflict::columns([entries::Column::EmployeeId, entries::Column::EntryDate])
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await;

    match result {
        Ok(inserted) => Entries::find_by_id(inserted.last_insert_id).one(db).await,
        Err(DbErr::RecordNotInserted) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Insert an exit, skipping it if the employee already has one that day.
pub async fn insert_exit<C>(db: &C, employee_id: i32, at: NaiveDateTime) -> Result<Option<exits::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let model = exits::ActiveModel {
        employee_id: Set(employee_id),
        exit_date: Set(at.date()),
        exit_at: Set(at),
        ..Default::default()
    };

    let result = Exits::insert(model)
        .on_conflict(
            OnConflict::columns([exits::Column::EmployeeId, exits::Column::ExitDate])
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await;

    match result {
        Ok(inserted) => Exits::find_by_id(inserted.last_insert_id).one(db).await,
        Err(DbErr::RecordNotInserted) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Create the day's statistics row, or refresh its lateness columns.
pub async fn upsert_entry_statistics<C>(db: &C, row: &DailyStatisticsRow) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let model = daily_statistics::ActiveModel {
        employee_id: Set(row.employee_id),
        work_date: Set(row.work_date),
        late_arrivals: Set(row.late_arrivals),
        minutes_late: Set(row.minutes_late),
        early_departures: Set(row.early_departures),
        minutes_early: Set(row.minutes_early),
        hours_worked: Set(row.hours_worked),
        ..Default::default()
    };

    DailyStatistics::insert(model)
        .on_conflict(
            OnConflict::columns([
                daily_statistics::Column::EmployeeId,
                daily_statistics::Column::WorkDate,
            ])
            .update_columns([
                daily_statistics::Column::LateArrivals,
                daily_statistics::Column::MinutesLate,
            ])
            .to_owned(),
        )
        .exec(db)
        .await?;

    Ok(())
}

/// Set hours worked on the day's statistics row.
pub async fn set_hours_worked<C>(db: &C, employee_id: i32, date: NaiveDate, hours_worked: f64) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let result = DailyStatistics::update_many()
        .col_expr(daily_statistics::Column::HoursWorked, Expr::value(hours_worked))
        .filter(daily_statistics::Column::EmployeeId.eq(employee_id))
        .filter(daily_statistics::Column::WorkDate.eq(date))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Get an employee's entry for a date.
pub async fn find_entry<C>(db: &C, employee_id: i32, date: NaiveDate) -> Result<Option<entries::Model>, DbErr>
where
    C: ConnectionTrait,
{
    Entries::find()
        .filter(entries::Column::EmployeeId.eq(employee_id))
        .filter(entries::Column::EntryDate.eq(date))
        .one(db)
        .await
}

/// Get an employee's exit for a date.
pub async fn find_exit<C>(db: &C, employee_id: i32, date: NaiveDate) -> Result<Option<exits::Model>, DbErr>
where
    C: ConnectionTrait,
{
    Exits::find()
        .filter(exits::Column::EmployeeId.eq(employee_id))
        .filter(exits::Column::ExitDate.eq(date))
        .one(db)
        .await
}

/// List entries by time, optionally for one date.
pub async fn list_entries<C>(db: &C, date: Option<NaiveDate>) -> Result<Vec<entries::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = Entries::find();
    if let Some(date) = date {
        query = query.filter(entries::Column::EntryDate.eq(date));
    }

    query
        .order_by_asc(entries::Column::EntryAt)
        .order_by_asc(entries::Column::Id)
        .all(db)
        .await
}

/// List exits by time, optionally for one date.
pub async fn list_exits<C>(db: &C, date: Option<NaiveDate>) -> Result<Vec<exits::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = Exits::find();
    if let Some(date) = date {
        query = query.filter(exits::Column::ExitDate.eq(date));
    }

    query
        .order_by_asc(exits::Column::ExitAt)
        .order_by_asc(exits::Column::Id)
        .all(db)
        .await
}

/// Get the statistics row for an employee and date.
pub async fn find_daily_statistics<C>(
    db: &C,
    employee_id: i32,
    date: NaiveDate,
) -> Result<Option<daily_statistics::Model>, DbErr>
where
    C: ConnectionTrait,
{
    DailyStatistics::find()
        .filter(daily_statistics::Column::EmployeeId.eq(employee_id))
        .filter(daily_statistics::Column::WorkDate.eq(date))
        .one(db)
        .await
}

impl From<entries::Model> for EntryRecord {
    fn from(model: entries::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            entry_date: model.entry_date,
            entry_at: model.entry_at,
        }
    }
}

impl From<exits::Model> for ExitRecord {
    fn from(model: exits::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            exit_date: model.exit_date,
            exit_at: model.exit_at,
        }
    }
}

impl From<daily_statistics::Model> for DailyStatisticsRow {
    fn from(model: daily_statistics::Model) -> Self {
        Self {
            employee_id: model.employee_id,
            work_date: model.work_date,
            late_arrivals: model.late_arrivals,
            minutes_late: model.minutes_late,
            early_departures: model.early_departures,
            minutes_early: model.minutes_early,
            hours_worked: model.hours_worked,
        }
    }
}
