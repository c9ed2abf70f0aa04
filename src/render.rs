//! Month calendar projection and the styling applied at the console edge.
//!
//! The grid is plain data computed from a ledger. Turning it into text goes
//! through a [`Palette`], so the core never sees escape codes.

use std::fmt::Write as _;

use strum::IntoEnumIterator;

use crate::error::{HrError, Result};
use crate::model::date::{CalendarDate, Weekday, days_in_month, is_valid_date, month_name, weekday};
use crate::model::ledger::Ledger;
use crate::model::marking::MarkingKind;

/// Semantic role of a piece of console text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Title,
    Success,
    Warning,
    Error,
    Vacation,
    Absence,
    Weekend,
    Plain,
}

impl From<MarkingKind> for Style {
    fn from(kind: MarkingKind) -> Self {
        match kind {
            MarkingKind::Vacation => Style::Vacation,
            MarkingKind::Absence => Style::Absence,
            MarkingKind::Weekend => Style::Weekend,
            MarkingKind::Free => Style::Plain,
        }
    }
}

/// Render target: decides how a [`Style`] looks on the output device.
pub trait Palette {
    fn paint(&self, style: Style, text: &str) -> String;
}

/// ANSI colors for terminals.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiPalette;

impl Palette for AnsiPalette {
    fn paint(&self, style: Style, text: &str) -> String {
        let code = match style {
            Style::Title => "34",
            Style::Success | Style::Vacation => "32",
            Style::Warning | Style::Weekend => "33",
            Style::Error => "31",
            Style::Absence => "35",
            Style::Plain => return text.to_string(),
        };
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

/// No decoration, for files, pipes and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPalette;

impl Palette for PlainPalette {
    fn paint(&self, _style: Style, text: &str) -> String {
        text.to_string()
    }
}

pub fn palette(color: bool) -> Box<dyn Palette> {
    if color {
        Box::new(AnsiPalette)
    } else {
        Box::new(PlainPalette)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub weekday: Weekday,
    pub kind: MarkingKind,
}

impl DayCell {
    /// `F` vacation, `X` absence, `S` weekend, blank otherwise.
    pub fn marker(&self) -> char {
        self.kind.code()
    }
}

/// Sunday-first month grid for one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: u32,
    pub year: i32,
    /// Empty cells before day 1, equal to the weekday index of the 1st.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    /// Rows of seven cells; `None` pads the first and last week.
    pub fn weeks(&self) -> Vec<[Option<DayCell>; 7]> {
        let mut weeks = Vec::new();
        let mut row = [None; 7];
        let mut column = self.leading_blanks as usize;
        for cell in &self.days {
            row[column] = Some(*cell);
            column += 1;
            if column == 7 {
                weeks.push(row);
                row = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(row);
        }
        weeks
    }
}

pub fn render_month(ledger: &Ledger, month: u32, year: i32) -> Result<MonthGrid> {
    if !is_valid_date(1, month, year) {
        return Err(HrError::InvalidMonthOrYear { month, year });
    }
    let leading_blanks = weekday(1, month, year)?.index();
    let mut days = Vec::new();
    for day in 1..=days_in_month(month, year)? {
        let date = CalendarDate::new(day, month, year);
        days.push(DayCell {
            day,
            weekday: date.weekday()?,
            kind: ledger.lookup(date)?,
        });
    }
    Ok(MonthGrid {
        month,
        year,
        leading_blanks,
        days,
    })
}

/// Text calendar with a title line, a weekday header and one line per week.
pub fn format_month(grid: &MonthGrid, owner: &str, palette: &dyn Palette) -> Result<String> {
    let mut out = String::new();
    let title = format!(
        "--- Calendario de {} para {} de {} ---",
        owner,
        month_name(grid.month)?,
        grid.year
    );
    let header: Vec<&str> = Weekday::iter().map(Weekday::short_name).collect();

    // writing into a String cannot fail
    let _ = writeln!(out, "{}", palette.paint(Style::Title, &title));
    let _ = writeln!(out, "{}", header.join(" "));
    for week in grid.weeks() {
        let line: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(cell) => palette.paint(
                    Style::from(cell.kind),
                    &format!("{:>2}{}", cell.day, cell.marker()),
                ),
                None => "   ".to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" ").trim_end());
    }
    Ok(out)
}
