use tracing::{info, warn};

use crate::error::{HrError, Result};
use crate::model::employee::Employee;

/// All employees, in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    employees: Vec<Employee>,
}

#[inline]
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_employees(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Largest id in use plus one.
    pub fn next_id(&self) -> u32 {
        self.employees.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    /// Case-insensitive exact name match.
    pub fn is_duplicate_name(&self, name: &str) -> bool {
        let name = normalize(name);
        self.employees.iter().any(|e| normalize(&e.name) == name)
    }

    /// Adds a new employee with an empty ledger.
    ///
    /// A name already on the roster is rejected with `DuplicateName`
    /// unless `force` is set.
    pub fn add(
        &mut self,
        name: &str,
        department: &str,
        annual_vacation_days: u32,
        force: bool,
    ) -> Result<&Employee> {
        let name = name.trim();
        if self.is_duplicate_name(name) {
            if !force {
                return Err(HrError::DuplicateName(name.to_string()));
            }
            warn!(name, "Adding employee with a duplicate name");
        }

        let id = self.next_id();
        let employee = Employee::new(id, name, department.trim()).with_allowance(annual_vacation_days);
        info!(id, name, department = %employee.department, "Employee added");
        self.employees.push(employee);
        Ok(&self.employees[self.employees.len() - 1])
    }

    pub fn get(&self, id: u32) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id == id)
    }

    fn position(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if query.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = query.parse::<u32>() {
                if let Some(index) = self.employees.iter().position(|e| e.id == id) {
                    return Some(index);
                }
            }
        }
        let needle = normalize(query);
        self.employees
            .iter()
            .position(|e| normalize(&e.name).contains(&needle))
    }

    /// Looks an employee up by id (numeric queries) or by part of the name.
    pub fn find(&self, query: &str) -> Result<&Employee> {
        self.position(query)
            .map(|index| &self.employees[index])
            .ok_or_else(|| HrError::EmployeeNotFound(query.to_string()))
    }

    pub fn find_mut(&mut self, query: &str) -> Result<&mut Employee> {
        match self.position(query) {
            Some(index) => Ok(&mut self.employees[index]),
            None => Err(HrError::EmployeeNotFound(query.to_string())),
        }
    }

    pub fn remove(&mut self, id: u32) -> Result<Employee> {
        let index = self
            .employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| HrError::EmployeeNotFound(id.to_string()))?;
        let removed = self.employees.remove(index);
        info!(id, name = %removed.name, "Employee removed");
        Ok(removed)
    }

    /// Departments in the order they first appear.
    pub fn departments(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for employee in &self.employees {
            if !seen.contains(&employee.department.as_str()) {
                seen.push(&employee.department);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Roster {
        let mut roster = Roster::new();
        roster.add("Ana Silva", "RH", 22, false).unwrap();
        roster.add("Bruno Costa", "IT", 22, false).unwrap();
        roster.add("Carla Dias", "Vendas", 25, false).unwrap();
        roster
    }

    #[test]
    fn ids_increase_from_the_largest_in_use() {
        let mut roster = sample();
        assert_eq!(roster.employees().iter().map(|e| e.id).collect::<Vec<_>>(), [1, 2, 3]);
        roster.remove(2).unwrap();
        assert_eq!(roster.next_id(), 4);
        roster.remove(3).unwrap();
        assert_eq!(roster.add("Duarte", "IT", 22, false).unwrap().id, 2);
    }

    #[test]
    fn duplicate_names_need_force() {
        let mut roster = sample();
        assert!(matches!(
            roster.add("ana silva", "IT", 22, false),
            Err(HrError::DuplicateName(_))
        ));
        assert_eq!(roster.len(), 3);
        let forced = roster.add("ANA SILVA", "IT", 22, true).unwrap();
        assert_eq!(forced.id, 4);
        assert_eq!(roster.len(), 4);
    }

    #[test]
    fn find_by_id_or_partial_name() {
        let roster = sample();
        assert_eq!(roster.find("2").unwrap().name, "Bruno Costa");
        assert_eq!(roster.find("carla").unwrap().id, 3);
        assert_eq!(roster.find("SILVA").unwrap().id, 1);
        assert!(matches!(roster.find("Zé"), Err(HrError::EmployeeNotFound(_))));
        // numeric query that is not an id falls back to the name search
        assert!(roster.find("42").is_err());
    }

    #[test]
    fn blank_query_matches_nobody() {
        let mut roster = sample();
        assert!(matches!(roster.find(""), Err(HrError::EmployeeNotFound(_))));
        assert!(matches!(roster.find("   "), Err(HrError::EmployeeNotFound(_))));
        assert!(roster.find_mut(" ").is_err());
    }

    #[test]
    fn new_employees_carry_the_configured_allowance() {
        let roster = sample();
        assert_eq!(roster.get(3).unwrap().annual_vacation_days, 25);
        assert!(roster.get(3).unwrap().ledger.is_empty());
    }

    #[test]
    fn remove_unknown_id_fails() {
        let mut roster = sample();
        assert!(matches!(roster.remove(9), Err(HrError::EmployeeNotFound(_))));
    }

    #[test]
    fn departments_in_first_seen_order() {
        let mut roster = sample();
        roster.add("Eva", "RH", 22, false).unwrap();
        assert_eq!(roster.departments(), ["RH", "IT", "Vendas"]);
    }
}
