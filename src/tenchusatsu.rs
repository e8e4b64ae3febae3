//! Tenchusatsu, the six "void period" groups.
//!
//! Pairing ten stems with twelve branches leaves two branches unmatched in
//! every run of ten consecutive indices. Those two branches name the group:
//! the run starting at 甲子 never reaches 戌 or 亥, so indices 1..=10 are
//! 戌亥 tenchusatsu.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sexagenary::{Branch, SexagenaryIndex};

/// Indices per group.
const BAND_WIDTH: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tenchusatsu {
    /// Indices 1..=10 (甲子 to 癸酉)
    InuI,
    /// Indices 11..=20 (甲戌 to 癸未)
    SaruTori,
    /// Indices 21..=30 (甲申 to 癸巳)
    UmaHitsuji,
    /// Indices 31..=40 (甲午 to 癸卯)
    TatsuMi,
    /// Indices 41..=50 (甲辰 to 癸丑)
    ToraU,
    /// Indices 51..=60 (甲寅 to 癸亥)
    NeUshi,
}

impl Tenchusatsu {
    /// All groups in band order.
    pub const ALL: [Self; 6] = [
        Self::InuI,
        Self::SaruTori,
        Self::UmaHitsuji,
        Self::TatsuMi,
        Self::ToraU,
        Self::NeUshi,
    ];

    /// The group a day index belongs to.
    pub const fn from_index(index: SexagenaryIndex) -> Self {
        Self::ALL[((index.get() - 1) / BAND_WIDTH) as usize]
    }

    const fn ordinal(self) -> u8 {
        match self {
            Self::InuI => 0,
            Self::SaruTori => 1,
            Self::UmaHitsuji => 2,
            Self::TatsuMi => 3,
            Self::ToraU => 4,
            Self::NeUshi => 5,
        }
    }

    /// The indices this group covers.
    pub const fn band(self) -> RangeInclusive<u8> {
        let start = self.ordinal() * BAND_WIDTH + 1;
        start..=start + BAND_WIDTH - 1
    }

    /// The two branches missing from this group's run of ten.
    pub const fn void_branches(self) -> (Branch, Branch) {
        match self {
            Self::InuI => (Branch::Inu, Branch::I),
            Self::SaruTori => (Branch::Saru, Branch::Tori),
            Self::UmaHitsuji => (Branch::Uma, Branch::Hitsuji),
            Self::TatsuMi => (Branch::Tatsu, Branch::Mi),
            Self::ToraU => (Branch::Tora, Branch::U),
            Self::NeUshi => (Branch::Ne, Branch::Ushi),
        }
    }

    /// Two-character label, e.g. `戌亥`.
    pub const fn label(self) -> &'static str {
        match self {
            Self::InuI => "戌亥",
            Self::SaruTori => "申酉",
            Self::UmaHitsuji => "午未",
            Self::TatsuMi => "辰巳",
            Self::ToraU => "寅卯",
            Self::NeUshi => "子丑",
        }
    }
}

impl fmt::Display for Tenchusatsu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies an optional day index; `None` means there was not enough data.
pub fn tenchusatsu_group(day_index: Option<SexagenaryIndex>) -> Option<Tenchusatsu> {
    day_index.map(Tenchusatsu::from_index)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tenchusatsu label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for Tenchusatsu {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.label() == trimmed)
            .ok_or_else(|| UnknownLabel(trimmed.to_owned()))
    }
}

impl Serialize for Tenchusatsu {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Tenchusatsu {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(value: u8) -> Tenchusatsu {
        Tenchusatsu::from_index(SexagenaryIndex::new(value).unwrap())
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(group(1), Tenchusatsu::InuI);
        assert_eq!(group(10), Tenchusatsu::InuI);
        assert_eq!(group(11), Tenchusatsu::SaruTori);
        assert_eq!(group(30), Tenchusatsu::UmaHitsuji);
        assert_eq!(group(31), Tenchusatsu::TatsuMi);
        assert_eq!(group(50), Tenchusatsu::ToraU);
        assert_eq!(group(51), Tenchusatsu::NeUshi);
        assert_eq!(group(60), Tenchusatsu::NeUshi);
    }

    #[test]
    fn test_bands_partition_the_cycle() {
        let mut covered = 0;
        for (ordinal, tenchusatsu) in Tenchusatsu::ALL.into_iter().enumerate() {
            let band = tenchusatsu.band();
            assert_eq!(band.clone().count(), 10);
            if ordinal > 0 {
                let previous = Tenchusatsu::ALL[ordinal - 1].band();
                assert_eq!(*band.start(), previous.end() + 1, "no gap or overlap");
            }
            for value in band {
                assert_eq!(group(value), tenchusatsu);
                covered += 1;
            }
        }
        assert_eq!(covered, 60);
    }

    #[test]
    fn test_void_branches_are_missing_from_band() {
        for tenchusatsu in Tenchusatsu::ALL {
            let (first, second) = tenchusatsu.void_branches();
            for value in tenchusatsu.band() {
                let branch = SexagenaryIndex::new(value).unwrap().branch();
                assert_ne!(branch, first, "{tenchusatsu} contains {value}");
                assert_ne!(branch, second, "{tenchusatsu} contains {value}");
            }
            assert_eq!(tenchusatsu.to_string(), format!("{first}{second}"));
        }
    }

    #[test]
    fn test_absent_day_index_has_no_group() {
        assert_eq!(tenchusatsu_group(None), None);
        assert_eq!(
            tenchusatsu_group(SexagenaryIndex::new(54).ok()),
            Some(Tenchusatsu::NeUshi)
        );
    }

    #[test]
    fn test_label_round_trip() {
        for tenchusatsu in Tenchusatsu::ALL {
            assert_eq!(tenchusatsu.label().parse::<Tenchusatsu>(), Ok(tenchusatsu));
            assert_eq!(tenchusatsu.to_string(), tenchusatsu.label());
        }
        assert_eq!(
            "子午".parse::<Tenchusatsu>(),
            Err(UnknownLabel("子午".to_owned()))
        );
    }

    #[test]
    fn test_serde_as_label() {
        let json = serde_json::to_string(&Tenchusatsu::TatsuMi).unwrap();
        assert_eq!(json, "\"辰巳\"");
        let parsed: Tenchusatsu = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Tenchusatsu::TatsuMi);
    }
}
