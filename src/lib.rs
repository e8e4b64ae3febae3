//! Sexagenary (kanshi) designations for Gregorian dates.
//!
//! Years and months turn over at risshun, the solar "beginning of spring",
//! rather than on January 1. Day indices progress continuously from
//! tabulated month anchors. The day index places a person in one of six
//! tenchusatsu groups, each with a short list of advisory messages.
//!
//! ```no_run
//! use kanshi::{Almanac, CalendarDate};
//!
//! let almanac = Almanac::bundled()?;
//! let date: CalendarDate = "1984-02-10".parse()?;
//! assert_eq!(almanac.year_index(date).get(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod almanac;
mod anchor;
mod config;
mod consts;
mod data;
mod messages;
mod prelude;
mod range;
mod risshun;
mod sexagenary;
mod tenchusatsu;
mod types;
pub mod wizard;

pub use almanac::{Almanac, DayHit, MonthHit, MonthKeying, Pillars};
pub use anchor::AnchorTable;
pub use config::{Config, ConfigError};
pub use consts::*;
pub use data::{DataError, parse_anchors, parse_messages, parse_risshun};
pub use messages::MessageCatalog;
pub use range::{CalendarDateRange, RangeError};
pub use risshun::RisshunTable;
pub use sexagenary::{Branch, IndexError, SexagenaryIndex, Stem, name_for, normalize_1_60};
pub use tenchusatsu::{Tenchusatsu, UnknownLabel, tenchusatsu_group};
pub use types::{YearMonth, days_in_month, is_leap_year};
pub use wizard::{Diagnosis, Wizard, WizardError};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use types::days_from_civil;

/// A validated Gregorian calendar date.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year:04}-{month:02}-{day:02}")]
pub struct CalendarDate {
    year:  u16,
    month: u8,
    day:   u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for DateError {}

impl CalendarDate {
    /// Creates a date, validating every component.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear`, `DateError::InvalidMonth` or
    /// `DateError::InvalidDay` for the first component out of range.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        let key = YearMonth::new(year, month)?;
        if day < MIN_DAY || day > days_in_month(key.year(), key.month()) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Callers guarantee the components form a valid date.
    pub(crate) const fn from_parts_unchecked(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// The calendar `(year, month)` this date falls in.
    pub const fn year_month(&self) -> YearMonth {
        YearMonth::from_parts_unchecked(self.year, self.month)
    }

    /// Days since 1970-01-01.
    pub fn epoch_day(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    /// Signed number of days from `earlier` to `self`.
    pub fn days_since(&self, earlier: &Self) -> i64 {
        self.epoch_day() - earlier.epoch_day()
    }

    /// Returns the components as a `(year, month, day)` tuple
    pub const fn to_columns(&self) -> (u16, u8, u8) {
        (self.year, self.month, self.day)
    }

    fn parse_u16(s: &str) -> Result<u16, DateError> {
        s.parse::<u16>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    fn parse_u8(s: &str) -> Result<u8, DateError> {
        s.parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    /// Parses `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(DateError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {} components: {trimmed}",
                parts.len()
            )));
        }

        // Parse components - InvalidFormat if not numeric
        let year = Self::parse_u16(parts[0])?;
        let month = Self::parse_u8(parts[1])?;
        let day = Self::parse_u8(parts[2])?;

        Self::new(year, month, day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
