use serde::Serialize;

use crate::model::aggregate::AbsenceTally;

/// One ledger entry in an employee calendar export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarExportRow {
    #[serde(rename = "ID")]
    pub employee_id: u32,
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Departamento")]
    pub department: String,
    /// `dd/mm/yyyy`
    #[serde(rename = "Data")]
    pub date: String,
    /// `F` or `X`
    #[serde(rename = "Tipo_Marcacao")]
    pub kind: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentExportRow {
    #[serde(rename = "Departamento")]
    pub department: String,
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Ferias_Ano")]
    pub vacation: u32,
    #[serde(rename = "Faltas_Ano")]
    pub absence: u32,
    #[serde(rename = "Dias_Restantes_Ferias")]
    pub remaining_vacation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardRow {
    pub id: u32,
    pub name: String,
    pub department: String,
    pub annual_vacation_days: u32,
    pub vacation: u32,
    pub absence: u32,
    pub remaining_vacation: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub year: i32,
    pub rows: Vec<DashboardRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReportRow {
    pub id: u32,
    pub name: String,
    #[serde(flatten)]
    pub tally: AbsenceTally,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub rows: Vec<MonthlyReportRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStatsRow {
    pub department: String,
    pub vacation: u32,
    pub absence: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentStatsReport {
    pub year: i32,
    pub rows: Vec<DepartmentStatsRow>,
    /// `None` when nobody was away in the year.
    pub busiest: Option<String>,
}
