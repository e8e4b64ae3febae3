//! `(year, month) -> index` tables.
//!
//! The same shape serves the month-index table, keyed by solar year and
//! setsu month, and the day-anchor table, keyed by calendar year and month
//! with the value giving the index of day 1. A key that is not present is
//! normal: published tables have gaps at the edges of their coverage.

use std::collections::HashMap;

use crate::sexagenary::{IndexError, SexagenaryIndex};
use crate::types::YearMonth;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorTable {
    entries: HashMap<YearMonth, SexagenaryIndex>,
}

impl AnchorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an anchor, returning the one it replaced.
    pub fn insert(&mut self, key: YearMonth, index: SexagenaryIndex) -> Option<SexagenaryIndex> {
        self.entries.insert(key, index)
    }

    /// Stores a raw tabulated value. 0 marks a missing entry and is skipped.
    ///
    /// # Errors
    /// Returns `IndexError::OutOfRange` for values above 60.
    pub fn insert_raw(&mut self, key: YearMonth, raw: u8) -> Result<bool, IndexError> {
        if raw == 0 {
            return Ok(false);
        }
        self.insert(key, SexagenaryIndex::new(raw)?);
        Ok(true)
    }

    pub fn get(&self, key: YearMonth) -> Option<SexagenaryIndex> {
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the nearest anchor at `start` or in the `lookback` months before it.
    pub fn find_at_or_before(
        &self,
        start: YearMonth,
        lookback: u32,
    ) -> Option<(YearMonth, SexagenaryIndex)> {
        let mut key = start;
        for _ in 0..=lookback {
            if let Some(index) = self.get(key) {
                return Some((key, index));
            }
            key = key.prev()?;
        }
        None
    }
}

impl FromIterator<(YearMonth, SexagenaryIndex)> for AnchorTable {
    fn from_iter<I: IntoIterator<Item = (YearMonth, SexagenaryIndex)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
