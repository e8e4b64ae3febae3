//! Three-step diagnosis session: enter a birth date, confirm it, read the result.
//!
//! The wizard holds no I/O of its own; a front end renders [`Wizard::step`]
//! and calls the transition for whatever the user chose. Transitions called
//! on the wrong step return [`WizardError::WrongStep`].

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::CalendarDate;
use crate::almanac::Almanac;
use crate::messages::MessageCatalog;
use crate::prelude::*;
use crate::range::CalendarDateRange;
use crate::sexagenary::{Branch, SexagenaryIndex};
use crate::tenchusatsu::Tenchusatsu;

const MISSING_GROUP_WARNING: &str = "この年の干支データは未登録のため、天中殺の診断ができません。";
const MISSING_MESSAGES_WARNING: &str = "この天中殺には現在、メッセージが登録されていません。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[display(fmt = "生年月日入力")]
    Input,
    #[display(fmt = "確認")]
    Confirm,
    #[display(fmt = "診断結果")]
    Result,
}

impl Step {
    pub const ALL: [Self; 3] = [Self::Input, Self::Confirm, Self::Result];

    /// 1-based position, as shown in "STEP n / 3".
    pub const fn number(self) -> usize {
        match self {
            Self::Input => 1,
            Self::Confirm => 2,
            Self::Result => 3,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::Input | Self::Confirm => Self::Input,
            Self::Result => Self::Confirm,
        }
    }
}

/// An index together with its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pillar {
    pub index: SexagenaryIndex,
    pub name:  &'static str,
}

impl From<SexagenaryIndex> for Pillar {
    fn from(index: SexagenaryIndex) -> Self {
        Self {
            index,
            name: index.name(),
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}（index: {}）", self.name, self.index.get())
    }
}

fn write_pillar(f: &mut fmt::Formatter<'_>, label: &str, pillar: Option<&Pillar>) -> fmt::Result {
    match pillar {
        Some(pillar) => writeln!(f, "{label}: {pillar}"),
        None => writeln!(f, "{label}: ・"),
    }
}

/// What the confirm step shows before the full diagnosis is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub birth_date: CalendarDate,
    pub year:       Pillar,
    pub day:        Option<Pillar>,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "生年月日: {}", self.birth_date)?;
        writeln!(f, "年干支（立春基準）: {}", self.year.name)?;
        write_pillar(f, "日干支", self.day.as_ref())
    }
}

/// The full result for one birth date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub birth_date:  CalendarDate,
    pub year:        Pillar,
    pub month:       Option<Pillar>,
    pub day:         Option<Pillar>,
    pub zodiac:      Branch,
    pub tenchusatsu: Option<Tenchusatsu>,
    /// Empty when the group is absent or has no registered lines.
    pub messages:    Vec<String>,
}

impl Diagnosis {
    pub fn compute(almanac: &Almanac, messages: &MessageCatalog, birth_date: CalendarDate) -> Self {
        let pillars = almanac.pillars(birth_date);
        let tenchusatsu = almanac.tenchusatsu(birth_date);
        Self {
            birth_date,
            year: pillars.year.into(),
            month: pillars.month.map(Pillar::from),
            day: pillars.day.map(Pillar::from),
            zodiac: almanac.zodiac(birth_date),
            tenchusatsu,
            messages: messages.lines_for(tenchusatsu).to_vec(),
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.birth_date.to_columns();
        writeln!(f, "生年月日: {year:04}年 {month:02}月 {day:02}日")?;
        writeln!(f, "年干支（立春基準）: {}", self.year.name)?;
        write_pillar(f, "月干支", self.month.as_ref())?;
        write_pillar(f, "日干支", self.day.as_ref())?;
        writeln!(f, "干支: {}年生まれ", self.zodiac)?;

        let Some(tenchusatsu) = self.tenchusatsu else {
            return writeln!(f, "{MISSING_GROUP_WARNING}");
        };
        writeln!(f, "天中殺: {tenchusatsu}")?;
        if self.messages.is_empty() {
            return writeln!(f, "{MISSING_MESSAGES_WARNING}");
        }
        for line in &self.messages {
            writeln!(f, "- {line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{date} is outside the supported range {range}")]
    OutOfRange { date: CalendarDate, range: CalendarDateRange },

    #[error("Cannot {action} during step {}: {step}", .step.number())]
    WrongStep { action: &'static str, step: Step },
}

#[derive(Debug, Clone)]
pub struct Wizard<'a> {
    almanac:    &'a Almanac,
    messages:   &'a MessageCatalog,
    range:      CalendarDateRange,
    step:       Step,
    birth_date: Option<CalendarDate>,
    result:     Option<Diagnosis>,
}

impl<'a> Wizard<'a> {
    pub const fn new(almanac: &'a Almanac, messages: &'a MessageCatalog, range: CalendarDateRange) -> Self {
        Self {
            almanac,
            messages,
            range,
            step: Step::Input,
            birth_date: None,
            result: None,
        }
    }

    pub const fn step(&self) -> Step {
        self.step
    }

    pub const fn range(&self) -> CalendarDateRange {
        self.range
    }

    /// The submitted date; kept when stepping back so the input can be prefilled.
    pub const fn birth_date(&self) -> Option<CalendarDate> {
        self.birth_date
    }

    pub const fn result(&self) -> Option<&Diagnosis> {
        self.result.as_ref()
    }

    /// `(current step number, step count)`.
    pub const fn progress(&self) -> (usize, usize) {
        (self.step.number(), Step::ALL.len())
    }

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                action,
                step: self.step,
            })
        }
    }

    /// Stores the birth date and moves to the confirm step.
    ///
    /// # Errors
    /// Returns `WizardError::OutOfRange` for dates outside the supported range
    /// and `WizardError::WrongStep` unless on the input step.
    pub fn submit(&mut self, date: CalendarDate) -> Result<(), WizardError> {
        self.expect_step(Step::Input, "submit")?;
        if !self.range.contains(&date) {
            return Err(WizardError::OutOfRange {
                date,
                range: self.range,
            });
        }
        debug!("wizard: submitted {date}");
        self.birth_date = Some(date);
        self.step = Step::Confirm;
        Ok(())
    }

    /// Year and day pillars for the submitted date.
    ///
    /// # Errors
    /// Returns `WizardError::WrongStep` unless on the confirm step.
    pub fn preview(&self) -> Result<Preview, WizardError> {
        let birth_date = self.submitted("preview", Step::Confirm)?;
        Ok(Preview {
            birth_date,
            year: self.almanac.year_index(birth_date).into(),
            day: self.almanac.day_index(birth_date).map(Pillar::from),
        })
    }

    /// Computes the diagnosis and moves to the result step.
    ///
    /// # Errors
    /// Returns `WizardError::WrongStep` unless on the confirm step.
    pub fn confirm(&mut self) -> Result<&Diagnosis, WizardError> {
        let birth_date = self.submitted("confirm", Step::Confirm)?;
        let diagnosis = Diagnosis::compute(self.almanac, self.messages, birth_date);
        debug!("wizard: {birth_date} diagnosed as {:?}", diagnosis.tenchusatsu);
        self.step = Step::Result;
        Ok(self.result.insert(diagnosis))
    }

    fn submitted(&self, action: &'static str, expected: Step) -> Result<CalendarDate, WizardError> {
        self.expect_step(expected, action)?;
        self.birth_date.ok_or(WizardError::WrongStep {
            action,
            step: self.step,
        })
    }

    /// One step back, staying on the input step once there.
    pub fn back(&mut self) -> Step {
        if self.step == Step::Result {
            self.result = None;
        }
        self.step = self.step.previous();
        self.step
    }

    /// Back to an empty input step.
    pub fn reset(&mut self) {
        self.step = Step::Input;
        self.birth_date = None;
        self.result = None;
    }
}
