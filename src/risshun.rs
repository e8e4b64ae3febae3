//! Risshun, the solar "beginning of spring" that opens the sexagenary year.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use log::debug;

use crate::CalendarDate;
use crate::consts::{DEFAULT_RISSHUN_DAY, FEBRUARY};

/// Tabulated risshun dates, one per year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RisshunTable {
    dates: BTreeMap<u16, CalendarDate>,
}

impl RisshunTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `date` as the risshun of its own year, returning the date it replaced.
    pub fn insert(&mut self, date: CalendarDate) -> Option<CalendarDate> {
        self.dates.insert(date.year(), date)
    }

    /// The tabulated risshun of `year`, if any.
    pub fn get(&self, year: u16) -> Option<CalendarDate> {
        self.dates.get(&year).copied()
    }

    /// The risshun of `year`, falling back to February 4 when the year is not
    /// tabulated. Dates far outside the table may be off by a day.
    pub fn risshun_date(&self, year: u16) -> CalendarDate {
        self.get(year).unwrap_or_else(|| {
            debug!("no risshun tabulated for {year}, assuming February {DEFAULT_RISSHUN_DAY}");
            Self::default_for(year)
        })
    }

    /// Whether `date` falls before the risshun of its own calendar year.
    pub fn is_before_risshun(&self, date: CalendarDate) -> bool {
        date < self.risshun_date(date.year())
    }

    /// First and last tabulated years.
    pub fn coverage(&self) -> Option<RangeInclusive<u16>> {
        let first = *self.dates.keys().next()?;
        let last = *self.dates.keys().next_back()?;
        Some(first..=last)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    const fn default_for(year: u16) -> CalendarDate {
        // February 4 exists in every year
        CalendarDate::from_parts_unchecked(year, FEBRUARY, DEFAULT_RISSHUN_DAY)
    }
}

impl FromIterator<CalendarDate> for RisshunTable {
    fn from_iter<I: IntoIterator<Item = CalendarDate>>(iter: I) -> Self {
        let mut table = Self::new();
        for date in iter {
            table.insert(date);
        }
        table
    }
}
