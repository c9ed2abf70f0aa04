use thiserror::Error;

use crate::model::date::CalendarDate;

/// Every failure the attendance core can report back to the operator.
///
/// None of these are fatal: callers print them and carry on.
#[derive(Error, Debug)]
pub enum HrError {
    #[error("Invalid date: {0}")]
    InvalidDate(CalendarDate),
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),
    #[error("Invalid month or year: {month:02}/{year}")]
    InvalidMonthOrYear { month: u32, year: i32 },
    #[error("{0} falls on a weekend and cannot be marked")]
    WeekendNotMarkable(CalendarDate),
    #[error("Only vacation or absence can be marked, got {0}")]
    UnmarkableKind(crate::model::marking::MarkingKind),
    #[error("No vacation days left in {year} for employee {employee_id}")]
    VacationExhausted { employee_id: u32, year: i32 },
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),
    #[error("An employee named '{0}' already exists")]
    DuplicateName(String),
    #[error("Department not found: {0}")]
    DepartmentNotFound(String),
    #[error("Training {0} not found")]
    TrainingNotFound(u32),
    #[error("Note {0} not found")]
    NoteNotFound(u32),
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HrError>;
