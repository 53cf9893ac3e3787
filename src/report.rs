//! Dashboard projections built from records, roster and evaluations.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::evaluator::{self, DayEvaluation, EmployeeStatistics};
use crate::models::{Employee, EntryRecord, ExitRecord, ShiftParameters};

/// Progress of an employee's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Clocked in, not yet out.
    InProgress,
    /// Clocked in and out.
    Complete,
}

/// Roster fields shown next to a day's records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSummary {
    pub id: i32,
    pub name: String,
    pub national_id: String,
    pub department_id: Option<i32>,
    pub position_id: Option<String>,
}

impl From<&Employee> for EmployeeSummary {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.full_name(),
            national_id: employee.national_id.clone(),
            department_id: employee.department_id,
            position_id: employee.position_id.clone(),
        }
    }
}

/// One employee's row in the daily report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRow {
    pub employee: EmployeeSummary,
    pub status: DayStatus,
    pub entry: EntryRecord,
    pub exit: Option<ExitRecord>,
    pub evaluation: DayEvaluation,
}

/// Everything the dashboard shows for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub records: Vec<AttendanceRow>,
    pub statistics: BTreeMap<i32, EmployeeStatistics>,
    pub late_arrivals: usize,
    pub total_employees: usize,
    pub complete_records: usize,
}

/// Evaluations across all records, as the shifts overview shows them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftOverview {
    pub parameters: ShiftParameters,
    pub evaluations: Vec<DayEvaluation>,
    pub statistics: BTreeMap<i32, EmployeeStatistics>,
    pub late_today: usize,
}

/// Join one date's entries and exits with the roster and evaluate them.
///
/// Only employees on the roster appear. Rows follow entry order.
pub fn daily_report(
    date: NaiveDate,
    roster: &[Employee],
    entries: &[EntryRecord],
    exits: &[ExitRecord],
    params: &ShiftParameters,
) -> DailyReport {
    let by_id: HashMap<i32, &Employee> = roster.iter().map(|e| (e.id, e)).collect();

    let day_entries: Vec<EntryRecord> = entries
        .iter()
        .filter(|e| e.entry_date == date && by_id.contains_key(&e.employee_id))
        .cloned()
        .collect();
    let day_exits: Vec<ExitRecord> = exits.iter().filter(|e| e.exit_date == date).cloned().collect();

    let evaluations = evaluator::evaluate_records(&day_entries, &day_exits, params);

    let records: Vec<AttendanceRow> = evaluations
        .iter()
        .filter_map(|evaluation| {
            let employee = by_id.get(&evaluation.employee_id)?;
            let entry = day_entries.iter().find(|e| e.employee_id == evaluation.employee_id)?;
            let exit = day_exits.iter().find(|e| e.employee_id == evaluation.employee_id);

            Some(AttendanceRow {
                employee: EmployeeSummary::from(*employee),
                status: if exit.is_some() {
                    DayStatus::Complete
                } else {
                    DayStatus::InProgress
                },
                entry: entry.clone(),
                exit: exit.cloned(),
                evaluation: evaluation.clone(),
            })
        })
        .collect();

    let complete_records = records.iter().filter(|r| r.status == DayStatus::Complete).count();

    DailyReport {
        date,
        statistics: evaluator::aggregate(&evaluations),
        late_arrivals: evaluator::late_arrivals_on(&evaluations, date),
        total_employees: records.len(),
        complete_records,
        records,
    }
}

/// Evaluate every record and summarise, counting late arrivals on `today`.
pub fn shift_overview(
    today: NaiveDate,
    entries: &[EntryRecord],
    exits: &[ExitRecord],
    params: ShiftParameters,
) -> ShiftOverview {
    let evaluations = evaluator::evaluate_records(entries, exits, &params);

    ShiftOverview {
        statistics: evaluator::aggregate(&evaluations),
        late_today: evaluator::late_arrivals_on(&evaluations, today),
        evaluations,
        parameters: params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveTime, Utc};

    fn params() -> ShiftParameters {
        ShiftParameters {
            id: 1,
            expected_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            expected_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            tolerance_minutes: 15,
            required_hours: 8.0,
            min_lunch_minutes: 60,
            active: true,
            created_at: DateTime::<Utc>::default(),
        }
    }

    fn employee(id: i32, name: &str) -> Employee {
        Employee {
            id,
            first_name: name.to_string(),
            second_name: None,
            first_surname: "Ruiz".to_string(),
            second_surname: None,
            national_id: format!("N{id}"),
            department_id: Some(1),
            position_id: None,
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn entry(id: i32, employee_id: i32, d: u32, h: u32, m: u32) -> EntryRecord {
        EntryRecord {
            id,
            employee_id,
            entry_date: date(d),
            entry_at: date(d).and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap()),
        }
    }

    fn exit(id: i32, employee_id: i32, d: u32, h: u32, m: u32) -> ExitRecord {
        ExitRecord {
            id,
            employee_id,
            exit_date: date(d),
            exit_at: date(d).and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap()),
        }
    }

    #[test]
    fn test_daily_report_joins_roster() {
        let roster = vec![employee(1, "Ana"), employee(2, "Jose"), employee(3, "Eva")];
        let entries = vec![
            entry(1, 1, 10, 8, 0),
            entry(2, 2, 10, 8, 30),
            entry(3, 99, 10, 8, 0),
            entry(4, 3, 11, 8, 0),
        ];
        let exits = vec![exit(1, 1, 10, 17, 0)];

        let report = daily_report(date(10), &roster, &entries, &exits, &params());

        assert_eq!(report.total_employees, 2);
        assert_eq!(report.complete_records, 1);
        assert_eq!(report.late_arrivals, 1);

        assert_eq!(report.records[0].employee.name, "Ana Ruiz");
        assert_eq!(report.records[0].status, DayStatus::Complete);
        assert!(report.records[0].evaluation.meets_shift);

        assert_eq!(report.records[1].status, DayStatus::InProgress);
        assert_eq!(report.records[1].evaluation.minutes_late, 15);

        assert_eq!(report.statistics.len(), 2);
        assert!(!report.statistics.contains_key(&99));
    }

    #[test]
    fn test_daily_report_empty_day() {
        let report = daily_report(date(12), &[employee(1, "Ana")], &[], &[], &params());
        assert!(report.records.is_empty());
        assert!(report.statistics.is_empty());
        assert_eq!(report.late_arrivals, 0);
    }

    #[test]
    fn test_shift_overview() {
        let entries = vec![entry(1, 1, 10, 8, 40), entry(2, 1, 11, 8, 0), entry(3, 2, 11, 9, 0)];
        let exits = vec![exit(1, 1, 10, 17, 0)];

        let overview = shift_overview(date(11), &entries, &exits, params());

        assert_eq!(overview.evaluations.len(), 3);
        assert_eq!(overview.late_today, 1);
        assert_eq!(overview.statistics[&1].days_worked, 2);
        assert_eq!(overview.statistics[&1].total_late_arrivals, 1);
    }
}
