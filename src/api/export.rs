use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::api::roster::Roster;
use crate::error::{HrError, Result};
use crate::model::aggregate::count_annual;
use crate::model::employee::Employee;
use crate::models::{CalendarExportRow, DepartmentExportRow};

/// Turns a name into something safe to use as a file name stem.
fn file_stem(text: &str) -> String {
    text.trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T], headers: &[&str]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    // serialize only emits a header with the first row
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn calendar_rows(employee: &Employee) -> Vec<CalendarExportRow> {
    employee
        .ledger
        .entries()
        .map(|(key, kind)| CalendarExportRow {
            employee_id: employee.id,
            name: employee.name.clone(),
            department: employee.department.clone(),
            date: key.to_date().to_string(),
            kind: kind.code(),
        })
        .collect()
}

/// Writes `<name>_calendario.csv` into `dir`, one row per marked day in date order.
pub fn export_employee_calendar(employee: &Employee, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}_calendario.csv", file_stem(&employee.name)));
    let rows = calendar_rows(employee);
    write_csv(
        &path,
        &rows,
        &["ID", "Nome", "Departamento", "Data", "Tipo_Marcacao"],
    )
    .inspect_err(|e| error!(employee_id = employee.id, error = %e, "Calendar export failed"))?;
    info!(employee_id = employee.id, rows = rows.len(), path = %path.display(), "Calendar exported");
    Ok(path)
}

pub fn department_rows(roster: &Roster, department: &str, year: i32) -> Result<Vec<DepartmentExportRow>> {
    let rows: Vec<DepartmentExportRow> = roster
        .employees()
        .iter()
        .filter(|e| e.department == department)
        .map(|e| {
            let tally = count_annual(&e.ledger, year);
            DepartmentExportRow {
                department: e.department.clone(),
                name: e.name.clone(),
                vacation: tally.vacation,
                absence: tally.absence,
                remaining_vacation: e.remaining_vacation_days(year),
            }
        })
        .collect();
    if rows.is_empty() {
        return Err(HrError::DepartmentNotFound(department.to_string()));
    }
    Ok(rows)
}

/// Writes `<department>_relatorio_<year>.csv` into `dir`.
pub fn export_department_report(
    roster: &Roster,
    department: &str,
    year: i32,
    dir: &Path,
) -> Result<PathBuf> {
    let rows = department_rows(roster, department, year)?;
    let path = dir.join(format!("{}_relatorio_{}.csv", file_stem(department), year));
    write_csv(
        &path,
        &rows,
        &[
            "Departamento",
            "Nome",
            "Ferias_Ano",
            "Faltas_Ano",
            "Dias_Restantes_Ferias",
        ],
    )
    .inspect_err(|e| error!(department, year, error = %e, "Department export failed"))?;
    info!(department, year, rows = rows.len(), path = %path.display(), "Department report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::date::CalendarDate;
    use crate::model::marking::MarkingKind;
    use tempfile::TempDir;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.add("Ana Silva", "Vendas", 22, false).unwrap();
        roster.add("Bruno", "IT", 22, false).unwrap();
        let ana = roster.get_mut(1).unwrap();
        ana.mark_day(CalendarDate::new(1, 8, 2024), MarkingKind::Absence).unwrap();
        ana.mark_day(CalendarDate::new(15, 7, 2024), MarkingKind::Vacation).unwrap();
        roster
    }

    #[test]
    fn employee_calendar_in_date_order() {
        let dir = TempDir::new().unwrap();
        let roster = roster();
        let path = export_employee_calendar(roster.get(1).unwrap(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Ana_Silva_calendario.csv");
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "ID,Nome,Departamento,Data,Tipo_Marcacao\n\
             1,Ana Silva,Vendas,15/07/2024,F\n\
             1,Ana Silva,Vendas,01/08/2024,X\n"
        );
    }

    #[test]
    fn empty_calendar_still_has_a_header() {
        let dir = TempDir::new().unwrap();
        let roster = roster();
        let path = export_employee_calendar(roster.get(2).unwrap(), dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "ID,Nome,Departamento,Data,Tipo_Marcacao\n"
        );
    }

    #[test]
    fn department_report() {
        let dir = TempDir::new().unwrap();
        let path = export_department_report(&roster(), "Vendas", 2024, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Vendas_relatorio_2024.csv");
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Departamento,Nome,Ferias_Ano,Faltas_Ano,Dias_Restantes_Ferias\n\
             Vendas,Ana Silva,1,1,21\n"
        );
    }

    #[test]
    fn unknown_department_writes_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            export_department_report(&roster(), "vendas", 2024, dir.path()),
            Err(HrError::DepartmentNotFound(_))
        ));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
