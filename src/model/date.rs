use chrono::{Datelike, Local};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::error::{HrError, Result};

/// Earliest year the calendar accepts.
pub const MIN_YEAR: i32 = 1900;
/// Latest year the calendar accepts.
pub const MAX_YEAR: i32 = 2100;

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// A (day, month, year) triple as typed by the operator.
///
/// Construction does not validate; every operation that turns a date into a
/// key or a weekday checks [`CalendarDate::is_valid`] first.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "{:02}/{:02}/{}", day, month, year)]
pub struct CalendarDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl CalendarDate {
    pub const fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Self::new(now.day(), now.month(), now.year())
    }

    pub fn is_valid(&self) -> bool {
        is_valid_date(self.day, self.month, self.year)
    }

    /// Returns the date back if it is valid, `InvalidDate` otherwise.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(HrError::InvalidDate(self))
        }
    }

    pub fn weekday(&self) -> Result<Weekday> {
        weekday(self.day, self.month, self.year)
    }

    pub fn day_of_year(&self) -> Result<u32> {
        day_of_year(self.day, self.month, self.year)
    }
}

/// Day of the week, Sunday first.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Weekday::Sunday),
            1 => Some(Weekday::Monday),
            2 => Some(Weekday::Tuesday),
            3 => Some(Weekday::Wednesday),
            4 => Some(Weekday::Thursday),
            5 => Some(Weekday::Friday),
            6 => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// 0 = Sunday … 6 = Saturday.
    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }

    /// Three-letter Portuguese label used in the calendar header.
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Dom",
            Weekday::Monday => "Seg",
            Weekday::Tuesday => "Ter",
            Weekday::Wednesday => "Qua",
            Weekday::Thursday => "Qui",
            Weekday::Friday => "Sex",
            Weekday::Saturday => "Sab",
        }
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(month: u32, year: i32) -> Result<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_leap_year(year) => Ok(29),
        2 => Ok(28),
        _ => Err(HrError::InvalidMonth(month)),
    }
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

pub fn is_valid_date(day: u32, month: u32, year: i32) -> bool {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return false;
    }
    match days_in_month(month, year) {
        Ok(last) => (1..=last).contains(&day),
        Err(_) => false,
    }
}

/// Ordinal of the date inside its year, 1..=366.
pub fn day_of_year(day: u32, month: u32, year: i32) -> Result<u32> {
    let date = CalendarDate::new(day, month, year).validated()?;
    let mut ordinal = date.day;
    for previous in 1..date.month {
        ordinal += days_in_month(previous, year)?;
    }
    Ok(ordinal)
}

/// Inverse of [`day_of_year`].
pub fn date_from_day_of_year(ordinal: u32, year: i32) -> Option<CalendarDate> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) || ordinal == 0 || ordinal > days_in_year(year) {
        return None;
    }
    let mut remaining = ordinal;
    for month in 1..=12 {
        let length = days_in_month(month, year).ok()?;
        if remaining <= length {
            return Some(CalendarDate::new(remaining, month, year));
        }
        remaining -= length;
    }
    None
}

/// Zeller's congruence, shifted so that Sunday is 0.
pub fn weekday(day: u32, month: u32, year: i32) -> Result<Weekday> {
    let date = CalendarDate::new(day, month, year).validated()?;

    // January and February count as months 13 and 14 of the previous year.
    let (m, y) = if date.month < 3 {
        (i64::from(date.month) + 12, i64::from(date.year) - 1)
    } else {
        (i64::from(date.month), i64::from(date.year))
    };
    let q = i64::from(date.day);
    let k = y.rem_euclid(100);
    let j = y.div_euclid(100);

    // h: 0 = Saturday, 1 = Sunday, ..., 6 = Friday
    let h = (q + (13 * (m + 1)) / 5 + k + k / 4 + j / 4 + 5 * j).rem_euclid(7);
    let sunday_first = ((h + 6) % 7) as u32;

    Weekday::from_index(sunday_first).ok_or(HrError::InvalidDate(date))
}

pub fn month_name(month: u32) -> Result<&'static str> {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .ok_or(HrError::InvalidMonth(month))
}
