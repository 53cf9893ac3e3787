//! Shift parameter models and time-of-day parsing.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::de;
use crate::error::{AppError, Result};

/// Active shift configuration the evaluator measures against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftParameters {
    pub id: i32,
    #[serde(with = "hh_mm")]
    pub expected_start: NaiveTime,
    #[serde(with = "hh_mm")]
    pub expected_end: NaiveTime,
    /// Grace period in minutes, applied to both ends of the shift.
    pub tolerance_minutes: i32,
    /// Hours needed for a day to count as a complete shift.
    pub required_hours: f64,
    /// Stored for the dashboard; not used in evaluation.
    pub min_lunch_minutes: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for activating new shift parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShiftParameters {
    pub expected_start: String,
    pub expected_end: String,
    #[serde(deserialize_with = "de::int")]
    pub tolerance_minutes: i32,
    #[serde(deserialize_with = "de::decimal")]
    pub required_hours: f64,
    #[serde(default, deserialize_with = "de::int")]
    pub min_lunch_minutes: i32,
}

/// Validated shift parameters ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShiftParameters {
    pub expected_start: NaiveTime,
    pub expected_end: NaiveTime,
    pub tolerance_minutes: i32,
    pub required_hours: f64,
    pub min_lunch_minutes: i32,
}

impl CreateShiftParameters {
    /// Parse times and check numeric ranges.
    pub fn validate(&self) -> Result<NewShiftParameters> {
        let expected_start = parse_time_of_day(&self.expected_start)
            .ok_or_else(|| AppError::validation(format!("Invalid expected start time '{}'", self.expected_start)))?;
        let expected_end = parse_time_of_day(&self.expected_end)
            .ok_or_else(|| AppError::validation(format!("Invalid expected end time '{}'", self.expected_end)))?;

        if self.tolerance_minutes < 0 {
            return Err(AppError::validation("Tolerance minutes cannot be negative"));
        }
        if !self.required_hours.is_finite() || !(0.0..=24.0).contains(&self.required_hours) {
            return Err(AppError::validation("Required hours must be between 0 and 24"));
        }
        if self.min_lunch_minutes < 0 {
            return Err(AppError::validation("Minimum lunch minutes cannot be negative"));
        }

        Ok(NewShiftParameters {
            expected_start,
            expected_end,
            tolerance_minutes: self.tolerance_minutes,
            required_hours: self.required_hours,
            min_lunch_minutes: self.min_lunch_minutes,
        })
    }
}

/// Parse `H:MM`, `HH:MM` or `HH:MM:SS` into a time of day.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let mut parts = value.trim().split(':');
    let hour = parts.next()?.parse::<u32>().ok()?;
    let minute = parts.next()?.parse::<u32>().ok()?;
    let second = match parts.next() {
        Some(s) => s.parse::<u32>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

/// `HH:MM` serde representation for configured times.
pub mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).ok_or_else(|| de::Error::custom(format!("invalid time of day '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> CreateShiftParameters {
        CreateShiftParameters {
            expected_start: start.to_string(),
            expected_end: end.to_string(),
            tolerance_minutes: 15,
            required_hours: 8.0,
            min_lunch_minutes: 30,
        }
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("08:00"), NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(parse_time_of_day("7:05"), NaiveTime::from_hms_opt(7, 5, 0));
        assert_eq!(parse_time_of_day("17:30:45"), NaiveTime::from_hms_opt(17, 30, 45));
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("08"), None);
        assert_eq!(parse_time_of_day("08:00:00:00"), None);
        assert_eq!(parse_time_of_day("eight"), None);
    }

    #[test]
    fn test_validate_ok() {
        let params = request("08:00", "17:00").validate().unwrap();
        assert_eq!(params.expected_start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(params.tolerance_minutes, 15);
    }

    #[test]
    fn test_validate_bad_time() {
        assert!(request("8am", "17:00").validate().is_err());
    }

    #[test]
    fn test_validate_negative_tolerance() {
        let mut req = request("08:00", "17:00");
        req.tolerance_minutes = -5;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_from_form_strings() {
        let req: CreateShiftParameters = serde_json::from_str(
            r#"{"expected_start":"08:00","expected_end":"17:00","tolerance_minutes":"15","required_hours":"8.5"}"#,
        )
        .unwrap();
        assert_eq!(req.tolerance_minutes, 15);
        assert_eq!(req.required_hours, 8.5);
        assert_eq!(req.min_lunch_minutes, 0);
    }

    #[test]
    fn test_serializes_times_as_hh_mm() {
        let params = ShiftParameters {
            id: 1,
            expected_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            expected_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            tolerance_minutes: 15,
            required_hours: 8.0,
            min_lunch_minutes: 0,
            active: true,
            created_at: DateTime::<Utc>::default(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["expected_start"], "08:00");
        assert_eq!(json["expected_end"], "17:00");
    }
}
