//! Calendar month/year values.
//!
//! Two textual forms exist: `MM-YYYY` (JSON output, create bodies, sum filters)
//! and `YYYY-MM` (update bodies). Both go through the named functions below.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub const WIRE_FORMAT: &str = "MM-YYYY";
pub const UPDATE_FORMAT: &str = "YYYY-MM";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid month/year '{input}', expected {expected}")]
pub struct MonthYearError {
    pub input: String,
    pub expected: &'static str,
}

/// A month of a year. Day-of-month is not tracked; internally pinned to the 1st.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(MonthYear)
    }

    /// Parse `MM-YYYY`.
    pub fn parse_wire(s: &str) -> Result<Self, MonthYearError> {
        let err = || MonthYearError {
            input: s.to_string(),
            expected: WIRE_FORMAT,
        };
        let (month, year) = s.split_once('-').ok_or_else(err)?;
        Self::from_parts(year, month).ok_or_else(err)
    }

    /// Parse `YYYY-MM`.
    pub fn parse_update(s: &str) -> Result<Self, MonthYearError> {
        let err = || MonthYearError {
            input: s.to_string(),
            expected: UPDATE_FORMAT,
        };
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        Self::from_parts(year, month).ok_or_else(err)
    }

    fn from_parts(year: &str, month: &str) -> Option<Self> {
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    /// `MM-YYYY`.
    pub fn to_wire(&self) -> String {
        format!("{:02}-{:04}", self.month(), self.year())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// January of year 1 stands for "unset".
    pub fn is_zero(&self) -> bool {
        self.year() == 1 && self.month() == 1
    }

    pub fn start_of_month(&self) -> NaiveDateTime {
        self.0.and_time(NaiveTime::MIN)
    }

    /// Last whole second of the month.
    pub fn end_of_month(&self) -> NaiveDateTime {
        let next = self.0 + Months::new(1);
        next.and_time(NaiveTime::MIN) - chrono::Duration::seconds(1)
    }

    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        let date = ts.date();
        MonthYear(date.with_day(1).unwrap_or(date))
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

impl Serialize for MonthYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        MonthYear::parse_wire(&s).map_err(de::Error::custom)
    }
}
