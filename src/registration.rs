//! Clock-in / clock-out registration.
//!
//! Per employee and local day: `NoRecord -> Entered -> Completed`. There is
//! no way back; anything out of order is a [`Rejection`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Rejection, Result};
use crate::evaluator;
use crate::models::{EntryRecord, ExitRecord, ShiftParameters};
use crate::store::AttendanceStore;

/// Where "today" is and whether late-day entries are refused.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationPolicy {
    pub timezone: Tz,
    /// Entries at or after this local time are refused.
    pub entry_cutoff: Option<NaiveTime>,
}

impl RegistrationPolicy {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            entry_cutoff: None,
        }
    }

    pub fn with_entry_cutoff(mut self, cutoff: Option<NaiveTime>) -> Self {
        self.entry_cutoff = cutoff;
        self
    }

    /// Wall-clock time in the configured timezone.
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.timezone).naive_local()
    }

    /// Calendar date in the configured timezone.
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_time(now).date()
    }
}

/// Which end of the day is being registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    Entry,
    Exit,
}

/// Record created by a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Registration {
    Entry(EntryRecord),
    Exit(ExitRecord),
}

impl Registration {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Entry(_) => "Entry registered successfully",
            Self::Exit(_) => "Exit registered successfully",
        }
    }
}

/// Register either end of the day. Requires active shift parameters.
pub async fn register(
    store: &dyn AttendanceStore,
    employee_id: i32,
    kind: RegistrationKind,
    now: DateTime<Utc>,
    policy: &RegistrationPolicy,
) -> Result<Registration> {
    let params = store
        .active_shift_parameters()
        .await?
        .ok_or(Rejection::NoActiveParameters)?;

    match kind {
        RegistrationKind::Entry => register_entry(store, employee_id, now, &params, policy)
            .await
            .map(Registration::Entry),
        RegistrationKind::Exit => register_exit(store, employee_id, now, policy)
            .await
            .map(Registration::Exit),
    }
}

/// Clock an employee in and record the day's lateness.
pub async fn register_entry(
    store: &dyn AttendanceStore,
    employee_id: i32,
    now: DateTime<Utc>,
    params: &ShiftParameters,
    policy: &RegistrationPolicy,
) -> Result<EntryRecord> {
    let local = policy.local_time(now);

    if let Some(cutoff) = policy.entry_cutoff
        && local.time() >= cutoff
    {
        return Err(Rejection::AfterCutoff(cutoff.format("%H:%M").to_string()).into());
    }

    if store.find_entry(employee_id, local.date()).await?.is_some() {
        return Err(Rejection::DuplicateEntry.into());
    }

    let lateness = evaluator::lateness(local.time(), params);

    // A concurrent request may have won since the lookup; the store decides.
    let entry = store
        .insert_entry(employee_id, local, lateness)
        .await?
        .ok_or(Rejection::DuplicateEntry)?;

    info!(
        "Entry registered: employee={} at={} minutes_late={}",
        employee_id, entry.entry_at, lateness.minutes_late
    );
    Ok(entry)
}

/// Clock an employee out and record hours worked since their entry.
pub async fn register_exit(
    store: &dyn AttendanceStore,
    employee_id: i32,
    now: DateTime<Utc>,
    policy: &RegistrationPolicy,
) -> Result<ExitRecord> {
    let local = policy.local_time(now);

    let entry = store
        .find_entry(employee_id, local.date())
        .await?
        .ok_or(Rejection::MissingEntry)?;

    if store.find_exit(employee_id, local.date()).await?.is_some() {
        return Err(Rejection::DuplicateExit.into());
    }

    let hours_worked = evaluator::hours_between(entry.entry_at.time(), local.time());

    let exit = store
        .insert_exit(employee_id, local, hours_worked)
        .await?
        .ok_or(Rejection::DuplicateExit)?;

    info!(
        "Exit registered: employee={} at={} hours_worked={:.2}",
        employee_id, exit.exit_at, hours_worked
    );
    Ok(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::NewShiftParameters;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn policy() -> RegistrationPolicy {
        RegistrationPolicy::new(chrono_tz::America::Managua)
    }

    fn managua(d: u32, h: u32, m: u32) -> DateTime<Utc> {
        chrono_tz::America::Managua
            .with_ymd_and_hms(2025, 3, d, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    async fn store_with_params() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .activate_shift_parameters(NewShiftParameters {
                expected_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                expected_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                tolerance_minutes: 15,
                required_hours: 8.0,
                min_lunch_minutes: 60,
            })
            .await
            .unwrap();
        store
    }

    fn rejection(err: AppError) -> Rejection {
        match err {
            AppError::Rejected(r) => r,
            other => panic!("expected rejection, got {other}"),
        }
    }

    #[test]
    fn test_local_date_uses_timezone() {
        // 03:00 UTC on the 11th is still the 10th in Managua.
        let now = Utc.with_ymd_and_hms(2025, 3, 11, 3, 0, 0).unwrap();
        assert_eq!(policy().local_date(now), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[tokio::test]
    async fn test_entry_records_lateness() {
        let store = store_with_params().await;
        let entry = register(&store, 4, RegistrationKind::Entry, managua(10, 8, 25), &policy())
            .await
            .unwrap();

        let Registration::Entry(entry) = entry else {
            panic!("expected entry");
        };
        assert_eq!(entry.entry_at.time(), NaiveTime::from_hms_opt(8, 25, 0).unwrap());

        let row = store.daily_statistics(4, entry.entry_date).await.unwrap().unwrap();
        assert_eq!(row.late_arrivals, 1);
        assert_eq!(row.minutes_late, 10);
        assert_eq!(row.hours_worked, 0.0);
    }

    #[tokio::test]
    async fn test_second_entry_same_day_rejected() {
        let store = store_with_params().await;
        register(&store, 4, RegistrationKind::Entry, managua(10, 8, 0), &policy())
            .await
            .unwrap();

        let err = register(&store, 4, RegistrationKind::Entry, managua(10, 9, 0), &policy())
            .await
            .unwrap_err();
        assert_eq!(rejection(err), Rejection::DuplicateEntry);
        assert_eq!(store.entries(None).await.unwrap().len(), 1);

        // Next local day is fine.
        register(&store, 4, RegistrationKind::Entry, managua(11, 8, 0), &policy())
            .await
            .unwrap();
        assert_eq!(store.entries(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_exit_before_entry_rejected() {
        let store = store_with_params().await;
        let err = register(&store, 4, RegistrationKind::Exit, managua(10, 17, 0), &policy())
            .await
            .unwrap_err();
        assert_eq!(rejection(err), Rejection::MissingEntry);
        assert!(store.exits(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_full_day() {
        let store = store_with_params().await;
        register(&store, 4, RegistrationKind::Entry, managua(10, 8, 10), &policy())
            .await
            .unwrap();
        let exit = register(&store, 4, RegistrationKind::Exit, managua(10, 17, 5), &policy())
            .await
            .unwrap();
        assert_eq!(exit.message(), "Exit registered successfully");

        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let row = store.daily_statistics(4, date).await.unwrap().unwrap();
        assert_eq!(row.late_arrivals, 0);
        assert_eq!(row.hours_worked, 8.92);

        let err = register(&store, 4, RegistrationKind::Exit, managua(10, 18, 0), &policy())
            .await
            .unwrap_err();
        assert_eq!(rejection(err), Rejection::DuplicateExit);
    }

    #[tokio::test]
    async fn test_no_active_parameters() {
        let store = MemoryStore::new();
        let err = register(&store, 4, RegistrationKind::Entry, managua(10, 8, 0), &policy())
            .await
            .unwrap_err();
        assert_eq!(rejection(err), Rejection::NoActiveParameters);
    }

    #[tokio::test]
    async fn test_entry_cutoff() {
        let store = store_with_params().await;
        let policy = policy().with_entry_cutoff(NaiveTime::from_hms_opt(12, 0, 0));

        let err = register(&store, 4, RegistrationKind::Entry, managua(10, 12, 0), &policy)
            .await
            .unwrap_err();
        assert_eq!(rejection(err), Rejection::AfterCutoff("12:00".to_string()));

        register(&store, 4, RegistrationKind::Entry, managua(10, 11, 59), &policy)
            .await
            .unwrap();
    }
}
