//! In-process store for development runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use tokio::sync::Mutex;

use super::AttendanceStore;
use crate::error::Result;
use crate::evaluator::Lateness;
use crate::models::{DailyStatistics, EntryRecord, ExitRecord, NewShiftParameters, ShiftParameters};

/// Attendance store kept in memory behind a single lock.
///
/// Check and insert happen under the same lock, so duplicate registrations
/// for one employee-day are impossible.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_id: i32,
    shift_parameters: Vec<ShiftParameters>,
    entries: Vec<EntryRecord>,
    exits: Vec<ExitRecord>,
    statistics: HashMap<(i32, NaiveDate), DailyStatistics>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn active_shift_parameters(&self) -> Result<Option<ShiftParameters>> {
        let state = self.state.lock().await;
        Ok(state.shift_parameters.iter().find(|p| p.active).cloned())
    }

    async fn activate_shift_parameters(&self, params: NewShiftParameters) -> Result<ShiftParameters> {
        let mut state = self.state.lock().await;
        for existing in state.shift_parameters.iter_mut() {
            existing.active = false;
        }

        let created = ShiftParameters {
            id: state.next_id(),
            expected_start: params.expected_start,
            expected_end: params.expected_end,
            tolerance_minutes: params.tolerance_minutes,
            required_hours: params.required_hours,
            min_lunch_minutes: params.min_lunch_minutes,
            active: true,
            created_at: Utc::now(),
        };
        state.shift_parameters.push(created.clone());
        Ok(created)
    }

    async fn find_entry(&self, employee_id: i32, date: NaiveDate) -> Result<Option<EntryRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .entries
            .iter()
            .find(|e| e.employee_id == employee_id && e.entry_date == date)
            .cloned())
    }

    async fn find_exit(&self, employee_id: i32, date: NaiveDate) -> Result<Option<ExitRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .exits
            .iter()
            .find(|e| e.employee_id == employee_id && e.exit_date == date)
            .cloned())
    }

    async fn insert_entry(
        &self,
        employee_id: i32,
        at: NaiveDateTime,
        lateness: Lateness,
    ) -> Result<Option<EntryRecord>> {
        let mut state = self.state.lock().await;
        let date = at.date();

        if state.entries.iter().any(|e| e.employee_id == employee_id && e.entry_date == date) {
            return Ok(None);
        }

        let entry = EntryRecord {
            id: state.next_id(),
            employee_id,
            entry_date: date,
            entry_at: at,
        };
        state.entries.push(entry.clone());

        let row = DailyStatistics::for_entry(employee_id, date, lateness.is_late, lateness.minutes_late);
        state
            .statistics
            .entry((employee_id, date))
            .and_modify(|existing| {
                existing.late_arrivals = row.late_arrivals;
                existing.minutes_late = row.minutes_late;
            })
            .or_insert(row);

        Ok(Some(entry))
    }

    async fn insert_exit(&self, employee_id: i32, at: NaiveDateTime, hours_worked: f64) -> Result<Option<ExitRecord>> {
        let mut state = self.state.lock().await;
        let date = at.date();

        if state.exits.iter().any(|e| e.employee_id == employee_id && e.exit_date == date) {
            return Ok(None);
        }

        let exit = ExitRecord {
            id: state.next_id(),
            employee_id,
            exit_date: date,
            exit_at: at,
        };
        state.exits.push(exit.clone());

        if let Some(row) = state.statistics.get_mut(&(employee_id, date)) {
            row.hours_worked = hours_worked;
        }

        Ok(Some(exit))
    }

    async fn entries(&self, date: Option<NaiveDate>) -> Result<Vec<EntryRecord>> {
        let state = self.state.lock().await;
        let mut entries: Vec<EntryRecord> = state
            .entries
            .iter()
            .filter(|e| date.is_none_or(|d| e.entry_date == d))
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.entry_at, e.id));
        Ok(entries)
    }

    async fn exits(&self, date: Option<NaiveDate>) -> Result<Vec<ExitRecord>> {
        let state = self.state.lock().await;
        let mut exits: Vec<ExitRecord> = state
            .exits
            .iter()
            .filter(|e| date.is_none_or(|d| e.exit_date == d))
            .cloned()
            .collect();
        exits.sort_by_key(|e| (e.exit_at, e.id));
        Ok(exits)
    }

    async fn daily_statistics(&self, employee_id: i32, date: NaiveDate) -> Result<Option<DailyStatistics>> {
        let state = self.state.lock().await;
        Ok(state.statistics.get(&(employee_id, date)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn new_params(start: u32) -> NewShiftParameters {
        NewShiftParameters {
            expected_start: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            expected_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            tolerance_minutes: 10,
            required_hours: 8.0,
            min_lunch_minutes: 30,
        }
    }

    #[tokio::test]
    async fn test_activation_keeps_single_active() {
        let store = MemoryStore::new();
        assert!(store.active_shift_parameters().await.unwrap().is_none());

        store.activate_shift_parameters(new_params(8)).await.unwrap();
        let second = store.activate_shift_parameters(new_params(7)).await.unwrap();

        let active = store.active_shift_parameters().await.unwrap().unwrap();
        assert_eq!(active.id, second.id);

        let state = store.state.lock().await;
        assert_eq!(state.shift_parameters.iter().filter(|p| p.active).count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_entry_returns_none() {
        let store = MemoryStore::new();
        let first = store.insert_entry(5, at(10, 8, 0), Lateness::default()).await.unwrap();
        let second = store.insert_entry(5, at(10, 9, 0), Lateness::default()).await.unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(store.entries(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_exit_updates_statistics() {
        let store = MemoryStore::new();
        let lateness = Lateness {
            minutes_late: 7,
            is_late: true,
        };
        store.insert_entry(5, at(10, 8, 17), lateness).await.unwrap();
        store.insert_exit(5, at(10, 17, 0), 8.72).await.unwrap();

        let date = at(10, 0, 0).date();
        let row = store.daily_statistics(5, date).await.unwrap().unwrap();
        assert_eq!(row.late_arrivals, 1);
        assert_eq!(row.minutes_late, 7);
        assert_eq!(row.hours_worked, 8.72);
    }

    #[tokio::test]
    async fn test_entries_filtered_and_ordered() {
        let store = MemoryStore::new();
        store.insert_entry(2, at(10, 9, 0), Lateness::default()).await.unwrap();
        store.insert_entry(1, at(10, 7, 30), Lateness::default()).await.unwrap();
        store.insert_entry(1, at(11, 8, 0), Lateness::default()).await.unwrap();

        let day = store.entries(Some(at(10, 0, 0).date())).await.unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].employee_id, 1);
        assert_eq!(day[1].employee_id, 2);
        assert_eq!(store.entries(None).await.unwrap().len(), 3);
    }
}
