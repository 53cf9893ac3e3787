//! Data models for shift parameters, attendance records and the roster.

pub mod attendance;
pub mod de;
pub mod employee;
pub mod shift;

pub use attendance::{DailyStatistics, EntryRecord, ExitRecord};
pub use employee::{Department, Employee};
pub use shift::{CreateShiftParameters, NewShiftParameters, ShiftParameters, parse_time_of_day};
