use std::collections::BTreeMap;

use derive_more::{Display, Into};

use crate::error::{HrError, Result};
use crate::model::date::CalendarDate;
use crate::model::marking::MarkingKind;

/// Ledger key for one calendar day, encoded as `YYYYMMDD`.
///
/// Keys from different years never collide and sort chronologically.
#[derive(Debug, Display, Into, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(u32);

impl DayKey {
    pub fn from_date(date: CalendarDate) -> Result<Self> {
        let date = date.validated()?;
        // validated years are within 1900..=2100, so the cast is lossless
        Ok(Self(date.year as u32 * 10_000 + date.month * 100 + date.day))
    }

    /// Accepts a raw key only if it decodes to a valid date.
    pub fn from_raw(raw: u32) -> Option<Self> {
        let key = Self(raw);
        key.to_date().is_valid().then_some(key)
    }

    pub fn to_date(self) -> CalendarDate {
        CalendarDate::new(self.0 % 100, (self.0 % 10_000) / 100, (self.0 / 10_000) as i32)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    /// A vacation or absence was already stored for the day and got replaced.
    Overwritten { previous: MarkingKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmarkOutcome {
    Removed(MarkingKind),
    NothingToRemove,
}

/// Sparse per-employee record of vacation and absence days.
///
/// Only `Vacation` and `Absence` are stored, every key is a valid weekday.
/// Unmarked weekdays read back as `Free`, Saturdays and Sundays as `Weekend`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: BTreeMap<DayKey, MarkingKind>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in chronological order.
    pub fn entries(&self) -> impl Iterator<Item = (DayKey, MarkingKind)> + '_ {
        self.entries.iter().map(|(key, kind)| (*key, *kind))
    }

    /// Key for a day that may receive a vacation or absence.
    pub fn writable_key(date: CalendarDate) -> Result<DayKey> {
        let key = DayKey::from_date(date)?;
        if date.weekday()?.is_weekend() {
            return Err(HrError::WeekendNotMarkable(date));
        }
        Ok(key)
    }

    pub fn mark(&mut self, date: CalendarDate, kind: MarkingKind) -> Result<MarkOutcome> {
        if !kind.is_markable() {
            return Err(HrError::UnmarkableKind(kind));
        }
        let key = Self::writable_key(date)?;
        Ok(match self.entries.insert(key, kind) {
            Some(previous) => MarkOutcome::Overwritten { previous },
            None => MarkOutcome::Marked,
        })
    }

    pub fn unmark(&mut self, date: CalendarDate) -> Result<UnmarkOutcome> {
        let key = DayKey::from_date(date)?;
        Ok(match self.entries.remove(&key) {
            Some(kind) => UnmarkOutcome::Removed(kind),
            None => UnmarkOutcome::NothingToRemove,
        })
    }

    pub fn lookup(&self, date: CalendarDate) -> Result<MarkingKind> {
        let key = DayKey::from_date(date)?;
        if let Some(kind) = self.entries.get(&key) {
            return Ok(*kind);
        }
        if date.weekday()?.is_weekend() {
            Ok(MarkingKind::Weekend)
        } else {
            Ok(MarkingKind::Free)
        }
    }
}
