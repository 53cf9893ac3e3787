//! Attendance evaluation.
//!
//! Turns entry/exit records into per-day evaluations against the active shift
//! parameters and rolls them up per employee. Everything here is pure; the
//! registration path reuses [`lateness`] and [`hours_between`] so both write
//! and read sides agree on the numbers.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::models::{EntryRecord, ExitRecord, ShiftParameters};

/// Shown in place of the exit time when the employee has not clocked out.
pub const NO_EXIT_RECORD: &str = "no record";

/// Lateness at clock-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Lateness {
    pub minutes_late: i64,
    pub is_late: bool,
}

/// Early departure at clock-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EarlyDeparture {
    pub minutes_early: i64,
    pub is_early_departure: bool,
}

/// One employee's evaluated working day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEvaluation {
    pub employee_id: i32,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_clock")]
    pub entry_time: NaiveTime,
    #[serde(serialize_with = "serialize_exit")]
    pub exit_time: Option<NaiveTime>,
    pub is_late: bool,
    pub is_early_departure: bool,
    pub minutes_late: i64,
    pub minutes_early: i64,
    pub hours_worked: f64,
    pub meets_shift: bool,
}

/// Running totals for one employee.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EmployeeStatistics {
    pub employee_id: i32,
    pub total_late_arrivals: u32,
    pub total_early_departures: u32,
    pub total_minutes_late: i64,
    pub total_minutes_early: i64,
    pub average_hours_worked: f64,
    pub days_worked: u32,
    pub days_complete_shift: u32,
}

impl EmployeeStatistics {
    fn new(employee_id: i32) -> Self {
        Self {
            employee_id,
            ..Default::default()
        }
    }

    /// Fold one evaluation into the totals.
    ///
    /// The mean is weighted by the day count *before* this day is counted.
    pub fn record(&mut self, evaluation: &DayEvaluation) {
        if evaluation.is_late {
            self.total_late_arrivals += 1;
            self.total_minutes_late += evaluation.minutes_late;
        }
        if evaluation.is_early_departure {
            self.total_early_departures += 1;
            self.total_minutes_early += evaluation.minutes_early;
        }
        if evaluation.meets_shift {
            self.days_complete_shift += 1;
        }

        let days = f64::from(self.days_worked);
        self.average_hours_worked = (self.average_hours_worked * days + evaluation.hours_worked) / (days + 1.0);
        self.days_worked += 1;
    }
}

/// Minutes since midnight. Seconds are ignored.
pub fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Minutes past `expected_start + tolerance`; arriving exactly on the boundary is on time.
pub fn lateness(entry: NaiveTime, params: &ShiftParameters) -> Lateness {
    let deadline = minutes_of_day(params.expected_start) + i64::from(params.tolerance_minutes);
    let minutes_late = (minutes_of_day(entry) - deadline).max(0);

    Lateness {
        minutes_late,
        is_late: minutes_late > 0,
    }
}

/// Minutes before `expected_end`; only flagged once they exceed the tolerance.
pub fn early_departure(exit: NaiveTime, params: &ShiftParameters) -> EarlyDeparture {
    let minutes_early = (minutes_of_day(params.expected_end) - minutes_of_day(exit)).max(0);

    EarlyDeparture {
        minutes_early,
        is_early_departure: minutes_early > i64::from(params.tolerance_minutes),
    }
}

/// Hours between two times of day, rounded to two decimals.
pub fn hours_between(entry: NaiveTime, exit: NaiveTime) -> f64 {
    round2((minutes_of_day(exit) - minutes_of_day(entry)) as f64 / 60.0)
}

/// Evaluate one day. `exit` must belong to the same employee and date.
pub fn evaluate_day(entry: &EntryRecord, exit: Option<&ExitRecord>, params: &ShiftParameters) -> DayEvaluation {
    let entry_time = entry.entry_at.time();
    let late = lateness(entry_time, params);

    let exit_time = exit.map(|e| e.exit_at.time());
    let (hours_worked, early) = match exit_time {
        Some(exit_time) => (hours_between(entry_time, exit_time), early_departure(exit_time, params)),
        None => (0.0, EarlyDeparture::default()),
    };

    let meets_shift = hours_worked >= params.required_hours && !late.is_late && !early.is_early_departure;

    DayEvaluation {
        employee_id: entry.employee_id,
        date: entry.entry_date,
        entry_time,
        exit_time,
        is_late: late.is_late,
        is_early_departure: early.is_early_departure,
        minutes_late: late.minutes_late,
        minutes_early: early.minutes_early,
        hours_worked,
        meets_shift,
    }
}

/// Pair entries with exits of the same employee and date and evaluate each day.
///
/// Output follows entry order. Only the first entry and the first exit per
/// employee-day are used.
pub fn evaluate_records(entries: &[EntryRecord], exits: &[ExitRecord], params: &ShiftParameters) -> Vec<DayEvaluation> {
    let mut exits_by_day: HashMap<(i32, NaiveDate), &ExitRecord> = HashMap::new();
    for exit in exits {
        exits_by_day.entry((exit.employee_id, exit.exit_date)).or_insert(exit);
    }

    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert((entry.employee_id, entry.entry_date)))
        .map(|entry| {
            let exit = exits_by_day.get(&(entry.employee_id, entry.entry_date)).copied();
            evaluate_day(entry, exit, params)
        })
        .collect()
}

/// Per-employee statistics in a single left-to-right pass.
///
/// Input order is kept as given. Floating accumulation may differ in the last
/// bits between orderings of the same days.
pub fn aggregate(evaluations: &[DayEvaluation]) -> BTreeMap<i32, EmployeeStatistics> {
    let mut stats: BTreeMap<i32, EmployeeStatistics> = BTreeMap::new();

    for evaluation in evaluations {
        stats
            .entry(evaluation.employee_id)
            .or_insert_with(|| EmployeeStatistics::new(evaluation.employee_id))
            .record(evaluation);
    }

    stats
}

/// Number of late arrivals on `date`.
pub fn late_arrivals_on(evaluations: &[DayEvaluation], date: NaiveDate) -> usize {
    evaluations.iter().filter(|e| e.is_late && e.date == date).count()
}

fn serialize_clock<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format("%H:%M:%S").to_string())
}

fn serialize_exit<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        Some(time) => serialize_clock(time, serializer),
        None => serializer.serialize_str(NO_EXIT_RECORD),
    }
}
