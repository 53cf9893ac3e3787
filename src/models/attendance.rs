//! Attendance records and the per-day statistics row.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Clock-in for one employee on one local day.
///
/// `entry_at` is wall-clock time in the configured timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: i32,
    pub employee_id: i32,
    pub entry_date: NaiveDate,
    pub entry_at: NaiveDateTime,
}

/// Clock-out for one employee on one local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRecord {
    pub id: i32,
    pub employee_id: i32,
    pub exit_date: NaiveDate,
    pub exit_at: NaiveDateTime,
}

/// Statistics row written by the registration path, one per employee and day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStatistics {
    pub employee_id: i32,
    pub work_date: NaiveDate,
    pub late_arrivals: i32,
    pub minutes_late: i32,
    pub early_departures: i32,
    pub minutes_early: i32,
    pub hours_worked: f64,
}

impl DailyStatistics {
    /// Fresh row for a day that just received its entry.
    pub fn for_entry(employee_id: i32, work_date: NaiveDate, is_late: bool, minutes_late: i64) -> Self {
        Self {
            employee_id,
            work_date,
            late_arrivals: i32::from(is_late),
            minutes_late: i32::try_from(minutes_late).unwrap_or(i32::MAX),
            early_departures: 0,
            minutes_early: 0,
            hours_worked: 0.0,
        }
    }
}
