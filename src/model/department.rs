use serde::Serialize;

use crate::model::aggregate::{AbsenceTally, count_annual};
use crate::model::employee::Employee;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentTotals {
    pub name: String,
    pub tally: AbsenceTally,
}

/// Yearly vacation and absence totals per department.
///
/// Departments keep the order in which they first appear in the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentStats {
    pub year: i32,
    pub departments: Vec<DepartmentTotals>,
}

impl DepartmentStats {
    pub fn get(&self, department: &str) -> Option<&AbsenceTally> {
        self.departments
            .iter()
            .find(|d| d.name == department)
            .map(|d| &d.tally)
    }

    /// Department with the most vacation + absence days.
    ///
    /// On a tie the department seen first wins. `None` when nobody was away.
    pub fn busiest(&self) -> Option<&DepartmentTotals> {
        let mut best: Option<&DepartmentTotals> = None;
        for totals in &self.departments {
            let current = best.map_or(0, |b| b.tally.total());
            if totals.tally.total() > current {
                best = Some(totals);
            }
        }
        best
    }
}

pub fn count_by_department(employees: &[Employee], year: i32) -> DepartmentStats {
    let mut stats = DepartmentStats {
        year,
        departments: Vec::new(),
    };
    for employee in employees {
        let tally = count_annual(&employee.ledger, year);
        match stats
            .departments
            .iter_mut()
            .find(|d| d.name == employee.department)
        {
            Some(existing) => existing.tally += tally,
            None => stats.departments.push(DepartmentTotals {
                name: employee.department.clone(),
                tally,
            }),
        }
    }
    stats
}
