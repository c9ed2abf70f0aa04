use tracing::{info, warn};

use crate::api::roster::Roster;
use crate::error::{HrError, Result};
use crate::model::date::CalendarDate;
use crate::model::employee::Employee;
use crate::model::ledger::{MarkOutcome, UnmarkOutcome};
use crate::model::marking::MarkingKind;

/// Colleague already on vacation on the requested day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacationConflict {
    pub employee_id: u32,
    pub name: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkReport {
    pub outcome: MarkOutcome,
    /// Advisory only, the day is marked either way.
    pub conflict: Option<VacationConflict>,
}

/// First colleague from the same department who is on vacation on `date`.
///
/// `employee` itself is skipped by id. This never blocks a marking.
pub fn check_vacation_conflict<'a>(
    employee: &Employee,
    date: CalendarDate,
    all_employees: &'a [Employee],
) -> Result<Option<&'a Employee>> {
    let date = date.validated()?;
    for peer in all_employees {
        if peer.id == employee.id || peer.department != employee.department {
            continue;
        }
        if peer.ledger.lookup(date)? == MarkingKind::Vacation {
            return Ok(Some(peer));
        }
    }
    Ok(None)
}

pub fn mark_day(
    roster: &mut Roster,
    employee_id: u32,
    date: CalendarDate,
    kind: MarkingKind,
) -> Result<MarkReport> {
    let employee = roster
        .get(employee_id)
        .ok_or_else(|| HrError::EmployeeNotFound(employee_id.to_string()))?;

    let conflict = if kind == MarkingKind::Vacation {
        check_vacation_conflict(employee, date, roster.employees())?.map(|peer| VacationConflict {
            employee_id: peer.id,
            name: peer.name.clone(),
            department: peer.department.clone(),
        })
    } else {
        None
    };

    let employee = roster
        .get_mut(employee_id)
        .ok_or_else(|| HrError::EmployeeNotFound(employee_id.to_string()))?;
    let outcome = employee.mark_day(date, kind)?;
    if let Some(conflict) = &conflict {
        warn!(
            employee_id,
            peer_id = conflict.employee_id,
            department = %conflict.department,
            %date,
            "Vacation overlaps with a colleague, marked anyway"
        );
    }
    match outcome {
        MarkOutcome::Marked => info!(employee_id, %date, %kind, "Day marked"),
        MarkOutcome::Overwritten { previous } => {
            warn!(employee_id, %date, %kind, %previous, "Day marked, previous entry overwritten")
        }
    }

    Ok(MarkReport { outcome, conflict })
}

pub fn unmark_day(roster: &mut Roster, employee_id: u32, date: CalendarDate) -> Result<UnmarkOutcome> {
    let employee = roster
        .get_mut(employee_id)
        .ok_or_else(|| HrError::EmployeeNotFound(employee_id.to_string()))?;
    let outcome = employee.unmark_day(date)?;
    match outcome {
        UnmarkOutcome::Removed(kind) => info!(employee_id, %date, %kind, "Day unmarked"),
        UnmarkOutcome::NothingToRemove => info!(employee_id, %date, "Nothing to unmark"),
    }
    Ok(outcome)
}
