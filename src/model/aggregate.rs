use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::error::{HrError, Result};
use crate::model::date::{CalendarDate, days_in_month, is_valid_date};
use crate::model::ledger::Ledger;
use crate::model::marking::MarkingKind;

/// Vacation and absence day counts over some period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Add, AddAssign, Serialize)]
pub struct AbsenceTally {
    pub vacation: u32,
    pub absence: u32,
}

impl AbsenceTally {
    pub fn total(&self) -> u32 {
        self.vacation + self.absence
    }

    fn record(&mut self, kind: MarkingKind) {
        match kind {
            MarkingKind::Vacation => self.vacation += 1,
            MarkingKind::Absence => self.absence += 1,
            MarkingKind::Free | MarkingKind::Weekend => {}
        }
    }
}

fn count_where(ledger: &Ledger, keep: impl Fn(CalendarDate) -> bool) -> AbsenceTally {
    let mut tally = AbsenceTally::default();
    for (key, kind) in ledger.entries() {
        if keep(key.to_date()) {
            tally.record(kind);
        }
    }
    tally
}

pub fn count_annual(ledger: &Ledger, year: i32) -> AbsenceTally {
    count_where(ledger, |date| date.year == year)
}

pub fn count_monthly(ledger: &Ledger, month: u32, year: i32) -> Result<AbsenceTally> {
    if !is_valid_date(1, month, year) {
        return Err(HrError::InvalidMonthOrYear { month, year });
    }
    Ok(count_where(ledger, |date| date.year == year && date.month == month))
}

/// Same answer as [`count_monthly`], computed by looking up every day of the month.
pub fn count_monthly_by_scan(ledger: &Ledger, month: u32, year: i32) -> Result<AbsenceTally> {
    if !is_valid_date(1, month, year) {
        return Err(HrError::InvalidMonthOrYear { month, year });
    }
    let mut tally = AbsenceTally::default();
    for day in 1..=days_in_month(month, year)? {
        tally.record(ledger.lookup(CalendarDate::new(day, month, year))?);
    }
    Ok(tally)
}
