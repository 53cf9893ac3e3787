//! PostgreSQL-backed [`AttendanceStore`].

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::{attendance, connection, shift};
use crate::error::Result;
use crate::evaluator::Lateness;
use crate::models::{DailyStatistics, EntryRecord, ExitRecord, NewShiftParameters, ShiftParameters};
use crate::store::AttendanceStore;

/// Attendance store over a SeaORM connection pool.
///
/// Record inserts and their statistics writes share a transaction.
#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl AttendanceStore for SqlStore {
    async fn ping(&self) -> Result<()> {
        connection::test_connection(&self.db).await?;
        Ok(())
    }

    async fn active_shift_parameters(&self) -> Result<Option<ShiftParameters>> {
        shift::get_active(&self.db).await?.map(shift::to_domain).transpose()
    }

    async fn activate_shift_parameters(&self, params: NewShiftParameters) -> Result<ShiftParameters> {
        let created = shift::activate(&self.db, &params).await?;
        shift::to_domain(created)
    }

    async fn find_entry(&self, employee_id: i32, date: NaiveDate) -> Result<Option<EntryRecord>> {
        Ok(attendance::find_entry(&self.db, employee_id, date).await?.map(Into::into))
    }

    async fn find_exit(&self, employee_id: i32, date: NaiveDate) -> Result<Option<ExitRecord>> {
        Ok(attendance::find_exit(&self.db, employee_id, date).await?.map(Into::into))
    }

    async fn insert_entry(
        &self,
        employee_id: i32,
        at: NaiveDateTime,
        lateness: Lateness,
    ) -> Result<Option<EntryRecord>> {
        let txn = self.db.begin().await?;

        let Some(entry) = attendance::insert_entry(&txn, employee_id, at).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let row = DailyStatistics::for_entry(employee_id, at.date(), lateness.is_late, lateness.minutes_late);
        attendance::upsert_entry_statistics(&txn, &row).await?;

        txn.commit().await?;
        Ok(Some(entry.into()))
    }

    async fn insert_exit(&self, employee_id: i32, at: NaiveDateTime, hours_worked: f64) -> Result<Option<ExitRecord>> {
        let txn = self.db.begin().await?;

        let Some(exit) = attendance::insert_exit(&txn, employee_id, at).await? else {
            txn.rollback().await?;
            return Ok(None);
        };

        let updated = attendance::set_hours_worked(&txn, employee_id, at.date(), hours_worked).await?;
        if updated == 0 {
            tracing::warn!(
                "No statistics row for employee {} on {}; hours worked not recorded",
                employee_id,
                at.date()
            );
        }

        txn.commit().await?;
        Ok(Some(exit.into()))
    }

    async fn entries(&self, date: Option<NaiveDate>) -> Result<Vec<EntryRecord>> {
        let rows = attendance::list_entries(&self.db, date).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exits(&self, date: Option<NaiveDate>) -> Result<Vec<ExitRecord>> {
        let rows = attendance::list_exits(&self.db, date).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn daily_statistics(&self, employee_id: i32, date: NaiveDate) -> Result<Option<DailyStatistics>> {
        Ok(attendance::find_daily_statistics(&self.db, employee_id, date)
            .await?
            .map(Into::into))
    }
}
