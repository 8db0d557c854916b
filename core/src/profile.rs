//! Birth profile – the fixed date every day of the heatmap is scored against.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected birth-date components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),

    #[error("day {day} is not valid for {year:04}-{month:02}")]
    InvalidDay { year: i32, month: u32, day: u32 },

    #[error("year {0} cannot be represented as a calendar date")]
    YearOutOfRange(i32),
}

/// A validated birth date.
///
/// Fields are private: a `BirthProfile` can only be obtained through
/// [`BirthProfile::new`] (or deserialisation, which goes through the same
/// check), so downstream code never observes an invalid date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProfile", into = "RawProfile")]
pub struct BirthProfile {
    date: NaiveDate,
}

/// Persisted `{year, month, day}` shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawProfile {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl BirthProfile {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::YearOutOfRange(year));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(|date| Self { date })
            .ok_or(ValidationError::InvalidDay { year, month, day })
    }

    /// Build a profile the way a year/month/day selector does: the day is
    /// clamped into the month, so picking the 31st and then switching to
    /// April yields April 30.
    pub fn clamped(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidMonth(month));
        }
        let last = num_days_in_month(year, month).ok_or(ValidationError::YearOutOfRange(year))?;
        let day = day.clamp(1, last);
        Self::new(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Default for BirthProfile {
    /// 1990-06-15, the date shown before anything has been persisted.
    fn default() -> Self {
        Self {
            date: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap_or(NaiveDate::MIN),
        }
    }
}

impl TryFrom<RawProfile> for BirthProfile {
    type Error = ValidationError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.month, raw.day)
    }
}

impl From<BirthProfile> for RawProfile {
    fn from(p: BirthProfile) -> Self {
        RawProfile {
            year: p.year(),
            month: p.month(),
            day: p.day(),
        }
    }
}

impl std::str::FromStr for BirthProfile {
    type Err = anyhow::Error;

    /// Parse `YYYY-MM-DD`.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = s.trim().splitn(3, '-').collect();
        let [year, month, day] = parts.as_slice() else {
            anyhow::bail!("Birth date must be YYYY-MM-DD, got {s:?}");
        };
        Ok(Self::new(year.parse()?, month.parse()?, day.parse()?)?)
    }
}

impl std::fmt::Display for BirthProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// Number of days in `month` (1–12) of `year`; `None` outside the calendar.
pub fn num_days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}
