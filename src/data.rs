//! Loading the reference tables.
//!
//! The tables ship with the crate under `data/` and can be replaced from a
//! directory holding files of the same names. Anchor tables are accepted in
//! three JSON shapes and normalized into `(year, month)` keys here, so the
//! resolvers only ever see one:
//!
//! - rows: `{ "1984": [2, 3, ...] }`, twelve values starting with January
//! - nested: `{ "1984": { "1": 2, "2": 3 } }`
//! - flat: `{ "1984-01": 2, "198402": 3 }`
//!
//! A value of 0 marks a missing entry in every shape.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::almanac::Almanac;
use crate::anchor::AnchorTable;
use crate::config::Config;
use crate::consts::MAX_MONTH;
use crate::messages::MessageCatalog;
use crate::risshun::RisshunTable;
use crate::sexagenary::IndexError;
use crate::tenchusatsu::{Tenchusatsu, UnknownLabel};
use crate::types::YearMonth;
use crate::{CalendarDate, DateError};

pub const RISSHUN_FILE: &str = "risshun.json";
pub const MONTH_ANCHORS_FILE: &str = "month_anchors.json";
pub const DAY_ANCHORS_FILE: &str = "day_anchors.json";
pub const MESSAGES_FILE: &str = "messages.json";

const BUNDLED_RISSHUN: &str = include_str!("../data/risshun.json");
const BUNDLED_MONTH_ANCHORS: &str = include_str!("../data/month_anchors.json");
const BUNDLED_DAY_ANCHORS: &str = include_str!("../data/day_anchors.json");
const BUNDLED_MESSAGES: &str = include_str!("../data/messages.json");

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {file}: {source}")]
    Json {
        file:   &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file}: invalid key {key:?}: {source}")]
    Key {
        file:   &'static str,
        key:    String,
        #[source]
        source: DateError,
    },

    #[error("{file}: year {year} has {len} monthly values (expected 12)")]
    RowLength { file: &'static str, year: u16, len: usize },

    #[error("{file}: bad value for {key}: {source}")]
    Value {
        file:   &'static str,
        key:    YearMonth,
        #[source]
        source: IndexError,
    },

    #[error("{file}: risshun listed under {year} falls on {date}")]
    RisshunYearMismatch {
        file: &'static str,
        year: u16,
        date: CalendarDate,
    },

    #[error("{file}: {key} is listed more than once")]
    DuplicateKey { file: &'static str, key: String },

    #[error("{file}: {source}")]
    Label {
        file:   &'static str,
        #[source]
        source: UnknownLabel,
    },
}

/// The shapes an anchor table may arrive in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAnchors {
    Rows(BTreeMap<String, Vec<u8>>),
    Nested(BTreeMap<String, BTreeMap<String, u8>>),
    Flat(BTreeMap<String, u8>),
}

fn from_json<'a, T: Deserialize<'a>>(json: &'a str, file: &'static str) -> Result<T, DataError> {
    serde_json::from_str(json).map_err(|source| DataError::Json { file, source })
}

fn parse_year(file: &'static str, key: &str) -> Result<u16, DataError> {
    let trimmed = key.trim();
    let invalid = |source| DataError::Key {
        file,
        key: key.to_owned(),
        source,
    };
    let year = trimmed
        .parse::<u16>()
        .map_err(|_| invalid(DateError::InvalidFormat(trimmed.to_owned())))?;
    YearMonth::new(year, 1).map_err(invalid)?;
    Ok(year)
}

fn parse_key(file: &'static str, year: &str, month: &str) -> Result<YearMonth, DataError> {
    let year = parse_year(file, year)?;
    let month = month.trim();
    let invalid = |source| DataError::Key {
        file,
        key: format!("{year}/{month}"),
        source,
    };
    let month = month
        .parse::<u8>()
        .map_err(|_| invalid(DateError::InvalidFormat(month.to_owned())))?;
    YearMonth::new(year, month).map_err(invalid)
}

/// Splits `YYYY-MM` or `YYYYMM`.
fn parse_flat_key(file: &'static str, key: &str) -> Result<YearMonth, DataError> {
    let trimmed = key.trim();
    let (year, month) = match trimmed.split_once(crate::DATE_SEPARATOR) {
        Some(parts) => parts,
        None if trimmed.len() == 6 && trimmed.is_ascii() => trimmed.split_at(4),
        None => {
            return Err(DataError::Key {
                file,
                key: key.to_owned(),
                source: DateError::InvalidFormat(trimmed.to_owned()),
            });
        },
    };
    parse_key(file, year, month)
}

/// Collects anchors, rejecting keys that normalize to one already seen.
struct AnchorLoader {
    file:  &'static str,
    table: AnchorTable,
    // includes keys whose value was 0
    seen:  BTreeSet<YearMonth>,
}

impl AnchorLoader {
    fn new(file: &'static str) -> Self {
        Self {
            file,
            table: AnchorTable::new(),
            seen: BTreeSet::new(),
        }
    }

    fn insert(&mut self, key: YearMonth, raw: u8) -> Result<(), DataError> {
        let file = self.file;
        if !self.seen.insert(key) {
            return Err(DataError::DuplicateKey {
                file,
                key: key.to_string(),
            });
        }
        self.table
            .insert_raw(key, raw)
            .map(|_| ())
            .map_err(|source| DataError::Value { file, key, source })
    }
}

/// Parses a risshun table: `{ "YYYY": "YYYY-MM-DD" }`.
///
/// # Errors
/// Returns `DataError` for malformed JSON, bad year keys, a year listed
/// twice, or a date filed under a different year.
pub fn parse_risshun(json: &str, file: &'static str) -> Result<RisshunTable, DataError> {
    let raw: BTreeMap<String, CalendarDate> = from_json(json, file)?;
    let mut table = RisshunTable::new();
    for (key, date) in raw {
        let year = parse_year(file, &key)?;
        if date.year() != year {
            return Err(DataError::RisshunYearMismatch { file, year, date });
        }
        if table.insert(date).is_some() {
            return Err(DataError::DuplicateKey {
                file,
                key: year.to_string(),
            });
        }
    }
    Ok(table)
}

/// Parses an anchor table in any of the accepted shapes.
///
/// # Errors
/// Returns `DataError` for malformed JSON, bad keys, keys listed twice,
/// rows that are not twelve long, or values above 60.
pub fn parse_anchors(json: &str, file: &'static str) -> Result<AnchorTable, DataError> {
    let mut loader = AnchorLoader::new(file);
    match from_json::<RawAnchors>(json, file)? {
        RawAnchors::Rows(rows) => {
            for (year_key, values) in rows {
                let year = parse_year(file, &year_key)?;
                if values.len() != usize::from(MAX_MONTH) {
                    return Err(DataError::RowLength {
                        file,
                        year,
                        len: values.len(),
                    });
                }
                for (month, raw) in (1..=MAX_MONTH).zip(values) {
                    loader.insert(YearMonth::from_parts_unchecked(year, month), raw)?;
                }
            }
        },
        RawAnchors::Nested(years) => {
            for (year_key, months) in years {
                for (month_key, raw) in months {
                    loader.insert(parse_key(file, &year_key, &month_key)?, raw)?;
                }
            }
        },
        RawAnchors::Flat(entries) => {
            for (key, raw) in entries {
                loader.insert(parse_flat_key(file, &key)?, raw)?;
            }
        },
    }
    Ok(loader.table)
}

/// Parses the message catalog: `{ "<group label>": ["line", ...] }`.
///
/// # Errors
/// Returns `DataError` for malformed JSON or an unknown group label.
pub fn parse_messages(json: &str, file: &'static str) -> Result<MessageCatalog, DataError> {
    let raw: BTreeMap<String, Vec<String>> = from_json(json, file)?;
    raw.into_iter()
        .map(|(label, lines)| {
            label
                .parse::<Tenchusatsu>()
                .map(|group| (group, lines))
                .map_err(|source| DataError::Label { file, source })
        })
        .collect()
}

fn read(dir: &Path, file: &'static str) -> Result<String, DataError> {
    let path = dir.join(file);
    std::fs::read_to_string(&path).map_err(|source| DataError::Io { path, source })
}

fn log_loaded(source: &str, almanac: &Almanac) {
    let coverage = almanac
        .risshun()
        .coverage()
        .map_or_else(|| "none".to_owned(), |years| format!("{}-{}", years.start(), years.end()));
    info!(
        "loaded {source} tables: risshun {coverage}, {} month anchors, {} day anchors",
        almanac.month_anchors().len(),
        almanac.day_anchors().len()
    );
}

fn check_messages(catalog: &MessageCatalog) {
    let missing = catalog.missing_groups();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|group| group.label()).collect();
        warn!("no messages registered for {}", labels.join(", "));
    }
}

impl Almanac {
    /// Tables bundled with the crate, covering 1900 through 2033.
    ///
    /// # Errors
    /// Returns `DataError` only if the bundled files are corrupt.
    pub fn bundled() -> Result<Self, DataError> {
        let almanac = Self::new(
            parse_risshun(BUNDLED_RISSHUN, RISSHUN_FILE)?,
            parse_anchors(BUNDLED_MONTH_ANCHORS, MONTH_ANCHORS_FILE)?,
            parse_anchors(BUNDLED_DAY_ANCHORS, DAY_ANCHORS_FILE)?,
        );
        log_loaded("bundled", &almanac);
        Ok(almanac)
    }

    /// Tables read from `dir`, using the same file names as the bundled data.
    ///
    /// # Errors
    /// Returns `DataError` if a file cannot be read or parsed.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        let almanac = Self::new(
            parse_risshun(&read(dir, RISSHUN_FILE)?, RISSHUN_FILE)?,
            parse_anchors(&read(dir, MONTH_ANCHORS_FILE)?, MONTH_ANCHORS_FILE)?,
            parse_anchors(&read(dir, DAY_ANCHORS_FILE)?, DAY_ANCHORS_FILE)?,
        );
        log_loaded(&dir.display().to_string(), &almanac);
        Ok(almanac)
    }

    /// Tables from the configured data directory (or the bundled ones), with
    /// the configured month keying.
    ///
    /// # Errors
    /// Returns `DataError` if the tables cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self, DataError> {
        let almanac = match &config.data_dir {
            Some(dir) => Self::from_dir(dir)?,
            None => Self::bundled()?,
        };
        Ok(almanac.with_keying(config.month_keying))
    }
}

impl MessageCatalog {
    /// Messages bundled with the crate.
    ///
    /// # Errors
    /// Returns `DataError` only if the bundled file is corrupt.
    pub fn bundled() -> Result<Self, DataError> {
        let catalog = parse_messages(BUNDLED_MESSAGES, MESSAGES_FILE)?;
        check_messages(&catalog);
        Ok(catalog)
    }

    /// Messages read from `dir`.
    ///
    /// # Errors
    /// Returns `DataError` if the file cannot be read or parsed.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let catalog = parse_messages(&read(dir.as_ref(), MESSAGES_FILE)?, MESSAGES_FILE)?;
        check_messages(&catalog);
        Ok(catalog)
    }

    /// Messages from the configured data directory, or the bundled ones.
    ///
    /// # Errors
    /// Returns `DataError` if the catalog cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self, DataError> {
        match &config.data_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::bundled(),
        }
    }
}
