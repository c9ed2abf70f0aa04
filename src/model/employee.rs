use serde::Serialize;

use crate::error::{HrError, Result};
use crate::model::aggregate::count_annual;
use crate::model::date::CalendarDate;
use crate::model::ledger::{Ledger, MarkOutcome, UnmarkOutcome};
use crate::model::marking::MarkingKind;

/// Vacation days granted per year unless configured otherwise.
pub const DEFAULT_ANNUAL_VACATION_DAYS: u32 = 22;

/// A course the employee completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Training {
    pub id: u32,
    pub course: String,
    /// Free text, usually `dd/mm/yyyy`.
    pub completed_on: String,
}

/// Internal note kept on the employee's file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: u32,
    pub text: String,
    pub created_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: u32,
    pub name: String,
    pub department: String,
    /// Vacation days granted per calendar year.
    pub annual_vacation_days: u32,
    pub ledger: Ledger,
    pub trainings: Vec<Training>,
    pub notes: Vec<Note>,
}

impl Employee {
    pub fn new(id: u32, name: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            department: department.into(),
            annual_vacation_days: DEFAULT_ANNUAL_VACATION_DAYS,
            ledger: Ledger::new(),
            trainings: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_allowance(mut self, annual_vacation_days: u32) -> Self {
        self.annual_vacation_days = annual_vacation_days;
        self
    }

    /// Allowance minus the vacation days already marked in `year`.
    pub fn remaining_vacation_days(&self, year: i32) -> u32 {
        self.annual_vacation_days
            .saturating_sub(count_annual(&self.ledger, year).vacation)
    }

    /// Marks a weekday, refusing new vacation once the year's allowance is used up.
    pub fn mark_day(&mut self, date: CalendarDate, kind: MarkingKind) -> Result<MarkOutcome> {
        if !kind.is_markable() {
            return Err(HrError::UnmarkableKind(kind));
        }
        Ledger::writable_key(date)?;
        if kind == MarkingKind::Vacation
            && self.ledger.lookup(date)? != MarkingKind::Vacation
            && self.remaining_vacation_days(date.year) == 0
        {
            return Err(HrError::VacationExhausted {
                employee_id: self.id,
                year: date.year,
            });
        }
        self.ledger.mark(date, kind)
    }

    pub fn unmark_day(&mut self, date: CalendarDate) -> Result<UnmarkOutcome> {
        self.ledger.unmark(date)
    }

    pub fn add_training(&mut self, course: impl Into<String>, completed_on: impl Into<String>) -> u32 {
        let id = self.trainings.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.trainings.push(Training {
            id,
            course: course.into(),
            completed_on: completed_on.into(),
        });
        id
    }

    /// Replaces the fields that are given, keeps the others.
    pub fn edit_training(
        &mut self,
        id: u32,
        course: Option<String>,
        completed_on: Option<String>,
    ) -> Result<&Training> {
        let training = self
            .trainings
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(HrError::TrainingNotFound(id))?;
        if let Some(course) = course {
            training.course = course;
        }
        if let Some(completed_on) = completed_on {
            training.completed_on = completed_on;
        }
        Ok(&*training)
    }

    pub fn remove_training(&mut self, id: u32) -> Result<Training> {
        let index = self
            .trainings
            .iter()
            .position(|t| t.id == id)
            .ok_or(HrError::TrainingNotFound(id))?;
        Ok(self.trainings.remove(index))
    }

    pub fn add_note(&mut self, text: impl Into<String>, created_on: impl Into<String>) -> u32 {
        let id = self.notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        self.notes.push(Note {
            id,
            text: text.into(),
            created_on: created_on.into(),
        });
        id
    }

    /// The creation date of a note never changes.
    pub fn edit_note(&mut self, id: u32, text: impl Into<String>) -> Result<&Note> {
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(HrError::NoteNotFound(id))?;
        note.text = text.into();
        Ok(&*note)
    }

    pub fn remove_note(&mut self, id: u32) -> Result<Note> {
        let index = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(HrError::NoteNotFound(id))?;
        Ok(self.notes.remove(index))
    }
}
