use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    JANUARY, LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR, MIN_DAY,
};
use crate::prelude::*;
use crate::{CalendarDate, DateError};

/// The canonical key shape of every anchor table: a year and a month.
///
/// Whether the year is the calendar year or the risshun-adjusted solar year
/// depends on the table being consulted; the key itself does not care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{year:04}-{month:02}")]
pub struct YearMonth {
    year:  u16,
    month: u8,
}

impl YearMonth {
    /// Creates a key, validating both components.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` or `DateError::InvalidMonth` when a
    /// component is out of range.
    pub fn new(year: u16, month: u8) -> Result<Self, DateError> {
        if year == 0 || year > MAX_YEAR {
            return Err(DateError::InvalidYear(year));
        }
        if month == 0 || month > MAX_MONTH {
            return Err(DateError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Callers guarantee both components are in range.
    pub(crate) const fn from_parts_unchecked(year: u16, month: u8) -> Self {
        Self { year, month }
    }

    #[inline]
    pub const fn year(self) -> u16 {
        self.year
    }

    #[inline]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// The month before this one, or `None` before January of year 1.
    pub const fn prev(self) -> Option<Self> {
        if self.month == JANUARY {
            if self.year <= 1 {
                None
            } else {
                Some(Self {
                    year:  self.year - 1,
                    month: DECEMBER,
                })
            }
        } else {
            Some(Self {
                year:  self.year,
                month: self.month - 1,
            })
        }
    }

    /// Day 1 of this month.
    pub const fn first_day(self) -> CalendarDate {
        CalendarDate::from_parts_unchecked(self.year, self.month, MIN_DAY)
    }
}

impl serde::Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

/// Days since 1970-01-01 of a proleptic Gregorian date.
///
/// Counts in 400-year eras with March as the first month so the leap day
/// falls at the end of each computational year.
pub fn days_from_civil(year: u16, month: u8, day: u8) -> i64 {
    let y = if month <= FEBRUARY {
        i64::from(year) - 1
    } else {
        i64::from(year)
    };
    let era = y.div_euclid(400);
    let year_of_era = y - era * 400;
    let shifted_month = (i64::from(month) + 9) % 12;
    let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(day) - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}
