//! Persistence interface for attendance data.
//!
//! Operations receive the store explicitly. Per-day uniqueness is the
//! store's job: `insert_entry`/`insert_exit` return `None` when the employee
//! already has a record for that day, however many requests raced to it.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::Result;
use crate::evaluator::Lateness;
use crate::models::{DailyStatistics, EntryRecord, ExitRecord, NewShiftParameters, ShiftParameters};

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<()>;

    /// The single active shift parameter set, if any.
    async fn active_shift_parameters(&self) -> Result<Option<ShiftParameters>>;

    /// Deactivate every active set and insert `params` as the active one, atomically.
    async fn activate_shift_parameters(&self, params: NewShiftParameters) -> Result<ShiftParameters>;

    async fn find_entry(&self, employee_id: i32, date: NaiveDate) -> Result<Option<EntryRecord>>;

    async fn find_exit(&self, employee_id: i32, date: NaiveDate) -> Result<Option<ExitRecord>>;

    /// Insert an entry dated `at.date()` and upsert that day's statistics row.
    ///
    /// Returns `None` if the employee already has an entry that day.
    async fn insert_entry(&self, employee_id: i32, at: NaiveDateTime, lateness: Lateness)
    -> Result<Option<EntryRecord>>;

    /// Insert an exit dated `at.date()` and set that day's hours worked.
    ///
    /// Returns `None` if the employee already has an exit that day.
    async fn insert_exit(&self, employee_id: i32, at: NaiveDateTime, hours_worked: f64) -> Result<Option<ExitRecord>>;

    /// Entries ordered by time, optionally restricted to one date.
    async fn entries(&self, date: Option<NaiveDate>) -> Result<Vec<EntryRecord>>;

    /// Exits ordered by time, optionally restricted to one date.
    async fn exits(&self, date: Option<NaiveDate>) -> Result<Vec<ExitRecord>>;

    async fn daily_statistics(&self, employee_id: i32, date: NaiveDate) -> Result<Option<DailyStatistics>>;
}
