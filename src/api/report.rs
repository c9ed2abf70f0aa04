//! Read-only summaries over the roster.
//!
//! Each report is built as plain rows first and then either formatted as an
//! aligned text table or serialized to JSON.

use std::fmt::Write as _;

use serde::Serialize;

use crate::api::roster::Roster;
use crate::error::{HrError, Result};
use crate::model::aggregate::{count_annual, count_monthly};
use crate::model::date::{is_valid_date, month_name};
use crate::model::department::count_by_department;
use crate::models::{
    Dashboard, DashboardRow, DepartmentStatsReport, DepartmentStatsRow, MonthlyReport,
    MonthlyReportRow,
};
use crate::render::{Palette, Style};

pub fn dashboard(roster: &Roster, year: i32) -> Dashboard {
    let rows = roster
        .employees()
        .iter()
        .map(|e| {
            let tally = count_annual(&e.ledger, year);
            DashboardRow {
                id: e.id,
                name: e.name.clone(),
                department: e.department.clone(),
                annual_vacation_days: e.annual_vacation_days,
                vacation: tally.vacation,
                absence: tally.absence,
                remaining_vacation: e.remaining_vacation_days(year),
            }
        })
        .collect();
    Dashboard { year, rows }
}

pub fn monthly_report(roster: &Roster, month: u32, year: i32) -> Result<MonthlyReport> {
    if !is_valid_date(1, month, year) {
        return Err(HrError::InvalidMonthOrYear { month, year });
    }
    let rows = roster
        .employees()
        .iter()
        .map(|e| {
            Ok(MonthlyReportRow {
                id: e.id,
                name: e.name.clone(),
                tally: count_monthly(&e.ledger, month, year)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(MonthlyReport { month, year, rows })
}

pub fn department_stats(roster: &Roster, year: i32) -> DepartmentStatsReport {
    let stats = count_by_department(roster.employees(), year);
    DepartmentStatsReport {
        year,
        busiest: stats.busiest().map(|d| d.name.clone()),
        rows: stats
            .departments
            .iter()
            .map(|d| DepartmentStatsRow {
                department: d.name.clone(),
                vacation: d.tally.vacation,
                absence: d.tally.absence,
                total: d.tally.total(),
            })
            .collect(),
    }
}

pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

// writeln! into a String cannot fail, hence the ignored results below.

pub fn format_dashboard(report: &Dashboard, palette: &dyn Palette) -> String {
    let mut out = String::new();
    let title = format!("=== Painel {} ===", report.year);
    let _ = writeln!(out, "{}", palette.paint(Style::Title, &title));
    let _ = writeln!(
        out,
        "{:<4} {:<20} {:<15} {:>5} {:>6} {:>6} {:>10}",
        "ID", "Nome", "Departamento", "Anual", "Ferias", "Faltas", "Restantes"
    );
    for row in &report.rows {
        let remaining = format!("{:>10}", row.remaining_vacation);
        let remaining_style = if row.remaining_vacation == 0 {
            Style::Warning
        } else {
            Style::Plain
        };
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:<15} {:>5} {:>6} {:>6} {}",
            row.id,
            row.name,
            row.department,
            row.annual_vacation_days,
            row.vacation,
            row.absence,
            palette.paint(remaining_style, &remaining)
        );
    }
    out
}

pub fn format_monthly_report(report: &MonthlyReport, palette: &dyn Palette) -> Result<String> {
    let mut out = String::new();
    let title = format!(
        "=== Relatorio de {} de {} ===",
        month_name(report.month)?,
        report.year
    );
    let _ = writeln!(out, "{}", palette.paint(Style::Title, &title));
    let _ = writeln!(out, "{:<4} {:<20} {:>6} {:>6}", "ID", "Nome", "Ferias", "Faltas");
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:>6} {:>6}",
            row.id, row.name, row.tally.vacation, row.tally.absence
        );
    }
    Ok(out)
}

pub fn format_department_stats(report: &DepartmentStatsReport, palette: &dyn Palette) -> String {
    let mut out = String::new();
    let title = format!("=== Estatisticas por departamento {} ===", report.year);
    let _ = writeln!(out, "{}", palette.paint(Style::Title, &title));
    let _ = writeln!(
        out,
        "{:<15} {:>6} {:>6} {:>6}",
        "Departamento", "Ferias", "Faltas", "Total"
    );
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:<15} {:>6} {:>6} {:>6}",
            row.department, row.vacation, row.absence, row.total
        );
    }
    let footer = match &report.busiest {
        Some(name) => palette.paint(Style::Warning, &format!("Departamento com mais ausencias: {name}")),
        None => palette.paint(Style::Success, "Sem ausencias registadas neste ano."),
    };
    let _ = writeln!(out, "{footer}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::date::CalendarDate;
    use crate::model::marking::MarkingKind;
    use crate::render::PlainPalette;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.add("Ana", "Vendas", 22, false).unwrap();
        roster.add("Bruno", "IT", 2, false).unwrap();
        roster.add("Carla", "Vendas", 22, false).unwrap();
        let mark = |r: &mut Roster, id: u32, d: u32, m: u32, kind| {
            r.get_mut(id).unwrap().mark_day(CalendarDate::new(d, m, 2024), kind).unwrap();
        };
        mark(&mut roster, 1, 15, 7, MarkingKind::Vacation);
        mark(&mut roster, 1, 16, 7, MarkingKind::Absence);
        mark(&mut roster, 2, 1, 8, MarkingKind::Vacation);
        mark(&mut roster, 2, 2, 8, MarkingKind::Vacation);
        mark(&mut roster, 2, 5, 8, MarkingKind::Absence);
        roster
    }

    #[test]
    fn dashboard_rows_follow_roster_order() {
        let report = dashboard(&roster(), 2024);
        let ids: Vec<u32> = report.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(report.rows[0].vacation, 1);
        assert_eq!(report.rows[0].remaining_vacation, 21);
        assert_eq!(report.rows[1].remaining_vacation, 0);
        assert_eq!(report.rows[1].annual_vacation_days, 2);
        assert_eq!(report.rows[0].annual_vacation_days, 22);
        assert_eq!(report.rows[2].absence, 0);
    }

    #[test]
    fn monthly_report_counts_only_that_month() {
        let report = monthly_report(&roster(), 7, 2024).unwrap();
        assert_eq!(report.rows[0].tally.vacation, 1);
        assert_eq!(report.rows[0].tally.absence, 1);
        assert_eq!(report.rows[1].tally.total(), 0);
        assert!(matches!(
            monthly_report(&roster(), 0, 2024),
            Err(HrError::InvalidMonthOrYear { month: 0, year: 2024 })
        ));
    }

    #[test]
    fn department_stats_picks_busiest() {
        let report = department_stats(&roster(), 2024);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].department, "Vendas");
        assert_eq!(report.rows[0].total, 2);
        assert_eq!(report.rows[1].total, 3);
        assert_eq!(report.busiest.as_deref(), Some("IT"));

        let quiet = department_stats(&roster(), 2023);
        assert_eq!(quiet.busiest, None);
        assert!(format_department_stats(&quiet, &PlainPalette).contains("Sem ausencias"));
    }

    #[test]
    fn text_tables() {
        let text = format_monthly_report(&monthly_report(&roster(), 7, 2024).unwrap(), &PlainPalette).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=== Relatorio de Julho de 2024 ===");
        assert_eq!(lines.len(), 2 + 3);
        assert!(lines[2].starts_with("1    Ana"));

        let text = format_dashboard(&dashboard(&roster(), 2024), &PlainPalette);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "=== Painel 2024 ===");
        // each row carries that employee's own allowance
        assert!(lines[3].starts_with("2    Bruno                IT                  2      2      1"));
    }

    #[test]
    fn json_output() {
        let json = to_json(&monthly_report(&roster(), 7, 2024).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["month"], 7);
        assert_eq!(value["rows"][0]["name"], "Ana");
        assert_eq!(value["rows"][0]["vacation"], 1);

        let json = to_json(&department_stats(&roster(), 2024)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["busiest"], "IT");
    }
}
