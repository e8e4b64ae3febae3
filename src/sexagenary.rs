//! The sixty stem-branch (kanshi) terms.
//!
//! Index 1 is 甲子. Each index pairs one of ten heavenly stems with one of
//! twelve earthly branches; both advance together, so the pair repeats every
//! sixty steps.

use std::num::NonZeroU8;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{BRANCH_COUNT, CYCLE_LEN, STEM_COUNT};
use crate::prelude::*;

/// The 60 stem-branch names in cycle order (position 0 = index 1).
const NAMES: [&str; 60] = [
    "甲子", "乙丑", "丙寅", "丁卯", "戊辰", "己巳", "庚午", "辛未", "壬申", "癸酉",
    "甲戌", "乙亥", "丙子", "丁丑", "戊寅", "己卯", "庚辰", "辛巳", "壬午", "癸未",
    "甲申", "乙酉", "丙戌", "丁亥", "戊子", "己丑", "庚寅", "辛卯", "壬辰", "癸巳",
    "甲午", "乙未", "丙申", "丁酉", "戊戌", "己亥", "庚子", "辛丑", "壬寅", "癸卯",
    "甲辰", "乙巳", "丙午", "丁未", "戊申", "己酉", "庚戌", "辛亥", "壬子", "癸丑",
    "甲寅", "乙卯", "丙辰", "丁巳", "戊午", "己未", "庚申", "辛酉", "壬戌", "癸亥",
];

/// A position in the sexagenary cycle, guaranteed to be in `1..=60`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SexagenaryIndex(NonZeroU8);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// A raw value outside `1..=60` reached an index constructor.
    #[error("Sexagenary index out of range: {0} (must be 1-60)")]
    OutOfRange(i64),

    #[error("Unknown stem-branch name: {0}")]
    UnknownName(String),
}

/// Wraps any integer into `1..=60`; 0 becomes 60, 61 becomes 1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn normalize_1_60(n: i64) -> u8 {
    let cycle = CYCLE_LEN as i64;
    // reduce first so no value of n can overflow
    ((n.rem_euclid(cycle) + cycle - 1) % cycle) as u8 + 1
}

/// Name of a stem-branch index, e.g. `甲子` for 1.
pub const fn name_for(index: SexagenaryIndex) -> &'static str {
    NAMES[index.position()]
}

impl SexagenaryIndex {
    /// 甲子, the start of the cycle.
    pub const FIRST: Self = Self(NonZeroU8::MIN);

    /// Creates an index, rejecting values outside `1..=60`.
    ///
    /// # Errors
    /// Returns `IndexError::OutOfRange` for 0 and values above 60.
    pub fn new(value: u8) -> Result<Self, IndexError> {
        match NonZeroU8::new(value) {
            Some(non_zero) if value <= CYCLE_LEN => Ok(Self(non_zero)),
            _ => Err(IndexError::OutOfRange(i64::from(value))),
        }
    }

    /// Wraps an arbitrary integer onto the cycle.
    pub const fn wrapping(n: i64) -> Self {
        match NonZeroU8::new(normalize_1_60(n)) {
            Some(non_zero) => Self(non_zero),
            // normalize_1_60 never yields 0
            None => Self::FIRST,
        }
    }

    /// Returns the index value (1..=60)
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Zero-based position, for table access.
    #[inline]
    const fn position(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Advances by `steps` (which may be negative), wrapping around the cycle.
    pub const fn offset(self, steps: i64) -> Self {
        Self::wrapping(self.0.get() as i64 + steps.rem_euclid(CYCLE_LEN as i64))
    }

    pub const fn name(self) -> &'static str {
        name_for(self)
    }

    pub const fn stem(self) -> Stem {
        Stem::ALL[self.position() % STEM_COUNT as usize]
    }

    pub const fn branch(self) -> Branch {
        Branch::ALL[self.position() % BRANCH_COUNT as usize]
    }

    /// Looks an index up by its two-character name.
    ///
    /// # Errors
    /// Returns `IndexError::UnknownName` when `name` is not one of the sixty.
    pub fn from_name(name: &str) -> Result<Self, IndexError> {
        let trimmed = name.trim();
        NAMES
            .iter()
            .position(|candidate| *candidate == trimmed)
            .map(|pos| Self::wrapping(pos as i64 + 1))
            .ok_or_else(|| IndexError::UnknownName(trimmed.to_owned()))
    }

    /// All sixty indices in cycle order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=i64::from(CYCLE_LEN)).map(Self::wrapping)
    }
}

impl TryFrom<u8> for SexagenaryIndex {
    type Error = IndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SexagenaryIndex> for u8 {
    fn from(index: SexagenaryIndex) -> Self {
        index.0.get()
    }
}

impl FromStr for SexagenaryIndex {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl std::fmt::Display for SexagenaryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The ten heavenly stems (jikkan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum Stem {
    #[display(fmt = "甲")]
    Kinoe,
    #[display(fmt = "乙")]
    Kinoto,
    #[display(fmt = "丙")]
    Hinoe,
    #[display(fmt = "丁")]
    Hinoto,
    #[display(fmt = "戊")]
    Tsuchinoe,
    #[display(fmt = "己")]
    Tsuchinoto,
    #[display(fmt = "庚")]
    Kanoe,
    #[display(fmt = "辛")]
    Kanoto,
    #[display(fmt = "壬")]
    Mizunoe,
    #[display(fmt = "癸")]
    Mizunoto,
}

impl Stem {
    /// All stems in cycle order (index 0 = 甲).
    pub const ALL: [Self; 10] = [
        Self::Kinoe,
        Self::Kinoto,
        Self::Hinoe,
        Self::Hinoto,
        Self::Tsuchinoe,
        Self::Tsuchinoto,
        Self::Kanoe,
        Self::Kanoto,
        Self::Mizunoe,
        Self::Mizunoto,
    ];
}

/// The twelve earthly branches (junishi), also the zodiac animals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum Branch {
    #[display(fmt = "子")]
    Ne,
    #[display(fmt = "丑")]
    Ushi,
    #[display(fmt = "寅")]
    Tora,
    #[display(fmt = "卯")]
    U,
    #[display(fmt = "辰")]
    Tatsu,
    #[display(fmt = "巳")]
    Mi,
    #[display(fmt = "午")]
    Uma,
    #[display(fmt = "未")]
    Hitsuji,
    #[display(fmt = "申")]
    Saru,
    #[display(fmt = "酉")]
    Tori,
    #[display(fmt = "戌")]
    Inu,
    #[display(fmt = "亥")]
    I,
}

impl Branch {
    /// All branches in cycle order (index 0 = 子).
    pub const ALL: [Self; 12] = [
        Self::Ne,
        Self::Ushi,
        Self::Tora,
        Self::U,
        Self::Tatsu,
        Self::Mi,
        Self::Uma,
        Self::Hitsuji,
        Self::Saru,
        Self::Tori,
        Self::Inu,
        Self::I,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_wraps() {
        assert_eq!(normalize_1_60(0), 60);
        assert_eq!(normalize_1_60(1), 1);
        assert_eq!(normalize_1_60(60), 60);
        assert_eq!(normalize_1_60(61), 1);
        assert_eq!(normalize_1_60(-1), 59);
        assert_eq!(normalize_1_60(58 + 4), 2);
    }

    #[test]
    fn test_normalize_period_is_sixty() {
        for n in -200..200 {
            let wrapped = normalize_1_60(n);
            assert_eq!(wrapped, normalize_1_60(n + 60), "n = {n}");
            assert!((1..=60).contains(&wrapped));
        }
    }

    #[test]
    fn test_normalize_extreme_values() {
        // i64::MIN = -(2^63) and 2^63 is 8 mod 60
        assert_eq!(normalize_1_60(i64::MIN), 52);
        assert_eq!(normalize_1_60(i64::MIN + 1), 53);
        assert_eq!(normalize_1_60(i64::MAX), 7);
        assert_eq!(normalize_1_60(i64::MAX - 6), 1);
    }

    #[test]
    fn test_new_valid() {
        assert_eq!(SexagenaryIndex::new(1).unwrap(), SexagenaryIndex::FIRST);
        assert_eq!(SexagenaryIndex::new(60).unwrap().get(), 60);
    }

    #[test]
    fn test_new_out_of_range() {
        assert_eq!(SexagenaryIndex::new(0), Err(IndexError::OutOfRange(0)));
        assert_eq!(SexagenaryIndex::new(61), Err(IndexError::OutOfRange(61)));
    }

    #[test]
    fn test_names_round_trip() {
        for index in SexagenaryIndex::all() {
            let name = name_for(index);
            assert!(!name.is_empty());
            assert_eq!(SexagenaryIndex::from_name(name).unwrap(), index);
        }
        assert_eq!(SexagenaryIndex::all().count(), 60);
    }

    #[test]
    fn test_name_is_stem_then_branch() {
        for index in SexagenaryIndex::all() {
            let expected = format!("{}{}", index.stem(), index.branch());
            assert_eq!(index.name(), expected, "index {}", index.get());
        }
    }

    #[test]
    fn test_known_names() {
        assert_eq!(SexagenaryIndex::new(1).unwrap().name(), "甲子");
        assert_eq!(SexagenaryIndex::new(11).unwrap().name(), "甲戌");
        assert_eq!(SexagenaryIndex::new(54).unwrap().name(), "丁巳");
        assert_eq!(SexagenaryIndex::new(60).unwrap().name(), "癸亥");
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(
            SexagenaryIndex::from_name("甲丑"),
            Err(IndexError::UnknownName("甲丑".to_owned()))
        );
        assert!("".parse::<SexagenaryIndex>().is_err());
    }

    #[test]
    fn test_offset() {
        let index = SexagenaryIndex::new(58).unwrap();
        assert_eq!(index.offset(4).get(), 2);
        assert_eq!(index.offset(0), index);
        assert_eq!(index.offset(-57).get(), 1);
        assert_eq!(index.offset(-58).get(), 60);
    }

    #[test]
    fn test_offset_extreme_steps() {
        assert_eq!(SexagenaryIndex::FIRST.offset(i64::MAX).get(), 8);
        assert_eq!(SexagenaryIndex::FIRST.offset(i64::MIN).get(), 53);
        let last = SexagenaryIndex::new(60).unwrap();
        assert_eq!(last.offset(i64::MAX).get(), 7);
        assert_eq!(last.offset(i64::MIN).get(), normalize_1_60(i64::MIN));
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(SexagenaryIndex::new(3).unwrap().to_string(), "丙寅");
        assert_eq!(Branch::Tatsu.to_string(), "辰");
        assert_eq!(Stem::Mizunoto.to_string(), "癸");
    }

    #[test]
    fn test_serde_as_number() {
        let index = SexagenaryIndex::new(54).unwrap();
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, "54");

        let parsed: SexagenaryIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, index);

        let bad: Result<SexagenaryIndex, _> = serde_json::from_str("0");
        assert!(bad.is_err());
    }
}
