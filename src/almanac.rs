//! Year, month and day index resolution.
//!
//! Every resolver is a pure function of the date and the tables held by
//! [`Almanac`], which never change after construction.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::CalendarDate;
use crate::anchor::AnchorTable;
use crate::consts::{CYCLE_EPOCH_YEAR, DECEMBER, FEBRUARY, JANUARY, MAX_ANCHOR_LOOKBACK};
use crate::risshun::RisshunTable;
use crate::sexagenary::{Branch, SexagenaryIndex};
use crate::tenchusatsu::Tenchusatsu;
use crate::types::YearMonth;

/// Which `(year, month)` keys the month-index table is consulted with, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthKeying {
    /// Only `(solar year, setsu month)`.
    Solar,
    /// `(solar year, setsu month)`, then `(calendar year, calendar month)`,
    /// then `(solar year, calendar month)`.
    #[default]
    SolarWithFallback,
    /// `(calendar year, calendar month)`, then `(solar year, setsu month)`,
    /// then `(solar year, calendar month)`.
    CalendarFirst,
}

/// A resolved month index and the table key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthHit {
    pub index: SexagenaryIndex,
    pub key:   YearMonth,
}

/// A resolved day index and how it was derived from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayHit {
    pub index:       SexagenaryIndex,
    /// Month whose day 1 carries the anchor.
    pub anchor_key:  YearMonth,
    pub anchor:      SexagenaryIndex,
    /// Days from the anchor's day 1 to the date; never negative.
    pub offset_days: i64,
}

/// The three indices of a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pillars {
    pub date:  CalendarDate,
    pub year:  SexagenaryIndex,
    pub month: Option<SexagenaryIndex>,
    pub day:   Option<SexagenaryIndex>,
}

/// The reference tables every resolver reads from.
#[derive(Debug, Clone, Default)]
pub struct Almanac {
    risshun:       RisshunTable,
    month_anchors: AnchorTable,
    day_anchors:   AnchorTable,
    keying:        MonthKeying,
}

impl Almanac {
    pub fn new(risshun: RisshunTable, month_anchors: AnchorTable, day_anchors: AnchorTable) -> Self {
        Self {
            risshun,
            month_anchors,
            day_anchors,
            keying: MonthKeying::default(),
        }
    }

    #[must_use]
    pub const fn with_keying(mut self, keying: MonthKeying) -> Self {
        self.keying = keying;
        self
    }

    pub const fn keying(&self) -> MonthKeying {
        self.keying
    }

    pub const fn risshun(&self) -> &RisshunTable {
        &self.risshun
    }

    pub const fn month_anchors(&self) -> &AnchorTable {
        &self.month_anchors
    }

    pub const fn day_anchors(&self) -> &AnchorTable {
        &self.day_anchors
    }

    /// The risshun of `year`, February 4 when untabulated.
    pub fn risshun_date(&self, year: u16) -> CalendarDate {
        self.risshun.risshun_date(year)
    }

    /// The sexagenary year a date belongs to: its calendar year, or the one
    /// before when the date precedes that year's risshun.
    pub fn solar_year(&self, date: CalendarDate) -> i32 {
        let year = i32::from(date.year());
        if self.risshun.is_before_risshun(date) {
            year - 1
        } else {
            year
        }
    }

    /// Year index; 1984 after risshun is 甲子. Defined for every date.
    pub fn year_index(&self, date: CalendarDate) -> SexagenaryIndex {
        let solar_year = self.solar_year(date);
        SexagenaryIndex::wrapping(i64::from(solar_year - CYCLE_EPOCH_YEAR) + 1)
    }

    /// The zodiac animal (eto) of the date's sexagenary year.
    pub fn zodiac(&self, date: CalendarDate) -> Branch {
        self.year_index(date).branch()
    }

    /// Setsu month number: January, and February before risshun, still
    /// belong to month 12 of the previous solar year.
    pub fn setsu_month(&self, date: CalendarDate) -> u8 {
        let month = date.month();
        if month == JANUARY || (month == FEBRUARY && self.risshun.is_before_risshun(date)) {
            DECEMBER
        } else {
            month
        }
    }

    /// Month-table keys to try for `date`, in the configured order.
    fn month_keys(&self, date: CalendarDate) -> Vec<YearMonth> {
        let solar_year = self.solar_year(date);
        let solar = table_key(solar_year, self.setsu_month(date));
        let calendar = Some(date.year_month());
        let solar_calendar_month = table_key(solar_year, date.month());

        let ordered = match self.keying {
            MonthKeying::Solar => vec![solar],
            MonthKeying::SolarWithFallback => vec![solar, calendar, solar_calendar_month],
            MonthKeying::CalendarFirst => vec![calendar, solar, solar_calendar_month],
        };

        let mut keys: Vec<YearMonth> = Vec::with_capacity(ordered.len());
        for key in ordered.into_iter().flatten() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Month index with the key that resolved it.
    pub fn month_lookup(&self, date: CalendarDate) -> Option<MonthHit> {
        let keys = self.month_keys(date);
        let hit = keys.iter().enumerate().find_map(|(attempt, &key)| {
            self.month_anchors.get(key).map(|index| (attempt, MonthHit { index, key }))
        });

        match hit {
            Some((0, hit)) => Some(hit),
            Some((attempt, hit)) => {
                debug!("month index for {date} resolved by fallback key {} (attempt {})", hit.key, attempt + 1);
                Some(hit)
            },
            None => {
                debug!("no month index tabulated for {date} (tried {} keys)", keys.len());
                None
            },
        }
    }

    /// Month index, or `None` when the table has no entry for any candidate key.
    pub fn month_index(&self, date: CalendarDate) -> Option<SexagenaryIndex> {
        self.month_lookup(date).map(|hit| hit.index)
    }

    /// Day index with the anchor it was counted from.
    ///
    /// Uses the calendar month, not the setsu month: days run continuously
    /// regardless of solar terms.
    pub fn day_lookup(&self, date: CalendarDate) -> Option<DayHit> {
        let target = date.year_month();
        let Some((anchor_key, anchor)) = self.day_anchors.find_at_or_before(target, MAX_ANCHOR_LOOKBACK)
        else {
            debug!("no day anchor within {MAX_ANCHOR_LOOKBACK} months before {date}");
            return None;
        };

        if anchor_key != target {
            debug!("day anchor for {target} missing, counting from {anchor_key}");
        }

        let offset_days = date.days_since(&anchor_key.first_day());
        debug_assert!(offset_days >= 0);
        let index = anchor.offset(offset_days);
        trace!("{date}: anchor {anchor_key}={} + {offset_days} days -> {index}", anchor.get());

        Some(DayHit {
            index,
            anchor_key,
            anchor,
            offset_days,
        })
    }

    /// Day index, or `None` when no anchor is close enough.
    pub fn day_index(&self, date: CalendarDate) -> Option<SexagenaryIndex> {
        self.day_lookup(date).map(|hit| hit.index)
    }

    /// Tenchusatsu group from the day index.
    pub fn tenchusatsu(&self, date: CalendarDate) -> Option<Tenchusatsu> {
        self.day_index(date).map(Tenchusatsu::from_index)
    }

    pub fn pillars(&self, date: CalendarDate) -> Pillars {
        Pillars {
            date,
            year: self.year_index(date),
            month: self.month_index(date),
            day: self.day_index(date),
        }
    }
}

/// A table key, if `year` is representable.
fn table_key(year: i32, month: u8) -> Option<YearMonth> {
    let year = u16::try_from(year).ok()?;
    YearMonth::new(year, month).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn key(year: u16, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn index(value: u8) -> SexagenaryIndex {
        SexagenaryIndex::new(value).unwrap()
    }

    fn risshun_feb_4() -> RisshunTable {
        (1982..=1986)
            .map(|year| CalendarDate::new(year, 2, 4).unwrap())
            .collect()
    }

    fn month_table() -> AnchorTable {
        [
            (key(1983, 12), index(1)),
            (key(1984, 1), index(2)),
            (key(1984, 2), index(3)),
            (key(1984, 3), index(4)),
            (key(1984, 12), index(13)),
            (key(1985, 1), index(14)),
        ]
        .into_iter()
        .collect()
    }

    fn almanac() -> Almanac {
        let days = [(key(1984, 1), index(31)), (key(1984, 3), index(58))]
            .into_iter()
            .collect();
        Almanac::new(risshun_feb_4(), month_table(), days)
    }

    #[test]
    fn test_year_index_anchor_year() {
        let almanac = almanac();
        assert_eq!(almanac.year_index(date("1984-02-10")).get(), 1);
        assert_eq!(almanac.year_index(date("1984-02-04")).get(), 1);
        assert_eq!(almanac.year_index(date("1984-01-15")).get(), 60);
        assert_eq!(almanac.year_index(date("1984-02-03")).get(), 60);
    }

    #[test]
    fn test_year_index_wraps_both_ways() {
        let almanac = Almanac::default();
        assert_eq!(almanac.year_index(date("2044-03-01")).get(), 1);
        assert_eq!(almanac.year_index(date("1924-03-01")).get(), 1);
        assert_eq!(almanac.year_index(date("1923-03-01")).get(), 60);
        assert_eq!(almanac.year_index(date("0001-01-01")).get(), 57);
    }

    #[test]
    fn test_year_index_steps_at_risshun() {
        let almanac = almanac();
        let before = almanac.year_index(date("1985-02-03"));
        let after = almanac.year_index(date("1985-02-04"));
        assert_eq!(after, before.offset(1));
        assert_eq!(almanac.year_index(date("1985-01-01")), almanac.year_index(date("1984-12-31")));
    }

    #[test]
    fn test_zodiac() {
        let almanac = almanac();
        assert_eq!(almanac.zodiac(date("1984-06-01")), Branch::Ne);
        assert_eq!(almanac.zodiac(date("1984-01-01")), Branch::I);
        assert_eq!(almanac.zodiac(date("1985-06-01")), Branch::Ushi);
    }

    #[test]
    fn test_setsu_month() {
        let almanac = almanac();
        assert_eq!(almanac.setsu_month(date("1984-01-31")), 12);
        assert_eq!(almanac.setsu_month(date("1984-02-03")), 12);
        assert_eq!(almanac.setsu_month(date("1984-02-04")), 2);
        assert_eq!(almanac.setsu_month(date("1984-07-20")), 7);
        assert_eq!(almanac.setsu_month(date("1984-12-31")), 12);
    }

    #[test]
    fn test_month_index_solar_key() {
        let almanac = almanac();
        let hit = almanac.month_lookup(date("1984-02-10")).unwrap();
        assert_eq!(hit, MonthHit { index: index(3), key: key(1984, 2) });

        // before risshun: month 12 of the previous solar year
        let hit = almanac.month_lookup(date("1984-02-03")).unwrap();
        assert_eq!(hit, MonthHit { index: index(1), key: key(1983, 12) });

        let hit = almanac.month_lookup(date("1985-01-15")).unwrap();
        assert_eq!(hit, MonthHit { index: index(13), key: key(1984, 12) });
    }

    #[test]
    fn test_month_index_fallback_to_calendar_key() {
        let months: AnchorTable = [(key(1984, 1), index(2))].into_iter().collect();
        let almanac = Almanac::new(risshun_feb_4(), months, AnchorTable::new());

        // (1983, 12) is missing, (1984, 1) is the calendar key
        let hit = almanac.month_lookup(date("1984-01-20")).unwrap();
        assert_eq!(hit.key, key(1984, 1));

        let strict = almanac.clone().with_keying(MonthKeying::Solar);
        assert_eq!(strict.month_index(date("1984-01-20")), None);
    }

    #[test]
    fn test_month_index_fallback_to_solar_year_calendar_month() {
        // only (solar year, calendar month) is present
        let months: AnchorTable = [(key(1983, 2), index(51))].into_iter().collect();
        let almanac = Almanac::new(risshun_feb_4(), months, AnchorTable::new());
        let hit = almanac.month_lookup(date("1984-02-01")).unwrap();
        assert_eq!(hit, MonthHit { index: index(51), key: key(1983, 2) });
    }

    #[test]
    fn test_month_index_calendar_first() {
        let almanac = almanac().with_keying(MonthKeying::CalendarFirst);
        let hit = almanac.month_lookup(date("1985-01-15")).unwrap();
        assert_eq!(hit, MonthHit { index: index(14), key: key(1985, 1) });

        // same answer either way once the solar and calendar keys agree
        assert_eq!(almanac.month_index(date("1984-03-10")), Some(index(4)));
    }

    #[test]
    fn test_month_index_absent() {
        let almanac = almanac();
        assert_eq!(almanac.month_index(date("1990-06-01")), None);
    }

    #[test]
    fn test_month_keys_are_deduplicated() {
        let almanac = almanac();
        // solar and calendar keys coincide after risshun
        assert_eq!(almanac.month_keys(date("1984-03-10")), vec![key(1984, 3)]);
        assert_eq!(
            almanac.month_keys(date("1985-01-15")),
            vec![key(1984, 12), key(1985, 1), key(1984, 1)]
        );
    }

    #[test]
    fn test_day_index_from_anchor() {
        let almanac = almanac();
        // anchor 58 on day 1: day 5 is 58 + 4 wrapped
        assert_eq!(almanac.day_index(date("1984-03-05")), Some(index(2)));
        assert_eq!(almanac.day_index(date("1984-03-01")), Some(index(58)));
    }

    #[test]
    fn test_day_index_progression() {
        let almanac = almanac();
        for day in 1..31 {
            let today = almanac.day_index(CalendarDate::new(1984, 3, day).unwrap()).unwrap();
            let tomorrow = almanac.day_index(CalendarDate::new(1984, 3, day + 1).unwrap()).unwrap();
            assert_eq!(tomorrow, today.offset(1), "1984-03-{day:02}");
        }
    }

    #[test]
    fn test_day_index_backward_search() {
        let almanac = almanac();
        // February is missing; count from January 1 (anchor 31)
        let hit = almanac.day_lookup(date("1984-02-10")).unwrap();
        assert_eq!(hit.anchor_key, key(1984, 1));
        assert_eq!(hit.offset_days, 40);
        assert_eq!(hit.index, index(11));
    }

    #[test]
    fn test_day_index_backward_search_is_bounded() {
        let days = [(key(1980, 1), index(1))].into_iter().collect();
        let almanac = Almanac::new(risshun_feb_4(), AnchorTable::new(), days);
        assert!(almanac.day_index(date("1983-01-31")).is_some());
        assert_eq!(almanac.day_index(date("1983-02-01")), None);
    }

    #[test]
    fn test_day_index_absent_before_any_anchor() {
        let almanac = almanac();
        assert_eq!(almanac.day_index(date("1983-12-31")), None);
        assert_eq!(almanac.tenchusatsu(date("1983-12-31")), None);
    }

    #[test]
    fn test_resolvers_are_pure() {
        let almanac = almanac();
        let d = date("1984-02-03");
        assert_eq!(almanac.pillars(d), almanac.pillars(d));
    }

    #[test]
    fn test_pillars() {
        let almanac = almanac();
        let pillars = almanac.pillars(date("1984-03-05"));
        assert_eq!(pillars.year, index(1));
        assert_eq!(pillars.month, Some(index(4)));
        assert_eq!(pillars.day, Some(index(2)));
        assert_eq!(almanac.tenchusatsu(date("1984-03-05")), Some(Tenchusatsu::InuI));
    }

    #[test]
    fn test_tables_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Almanac>();
        assert_send_sync::<crate::MessageCatalog>();
        assert_send_sync::<crate::Diagnosis>();

        let almanac = almanac();
        let d = date("1984-03-05");
        let from_thread = std::thread::scope(|scope| scope.spawn(|| almanac.pillars(d)).join());
        assert_eq!(from_thread.ok(), Some(almanac.pillars(d)));
    }

    #[test]
    fn test_keying_serde() {
        let keying: MonthKeying = serde_json::from_str("\"calendar_first\"").unwrap();
        assert_eq!(keying, MonthKeying::CalendarFirst);
        assert_eq!(serde_json::to_string(&MonthKeying::default()).unwrap(), "\"solar_with_fallback\"");
    }
}
