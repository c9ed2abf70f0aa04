//! Flat-file store for the roster.
//!
//! One line per employee, fields separated by `;`:
//!
//! ```text
//! id;name;department;annual_vacation_days;calendar;trainings;notes
//! 7;Dqd Vloyd;UK;25;20240715:F,20240716:X;1~Rust~01/02/2024;1~Sem notas~10/01/2024
//! ```
//!
//! * name and department are Caesar-shifted ([`cipher::SHIFT`]);
//! * calendar entries are `YYYYMMDD:code` joined by `,` (`F` vacation, `X` absence);
//! * trainings and notes are `id~text~date` items joined by `|`;
//! * `\ ; | , ~` and line breaks inside free text are backslash-escaped.
//!
//! The whole file is rewritten on every save.

use std::fs;
use std::path::Path;

use tracing::{error, info, warn};

use crate::api::roster::Roster;
use crate::error::{HrError, Result};
use crate::model::employee::{Employee, Note, Training};
use crate::model::ledger::DayKey;
use crate::model::marking::MarkingKind;
use crate::utils::cipher;

const FIELD_SEP: char = ';';
const ENTRY_SEP: char = ',';
const ITEM_SEP: char = '|';
const PART_SEP: char = '~';
const FIELD_COUNT: usize = 7;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | ';' | '|' | ',' | '~' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Splits on `sep`, ignoring escaped separators. Pieces keep their escapes.
fn split_escaped(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (index, c) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            pieces.push(&text[start..index]);
            start = index + c.len_utf8();
        }
    }
    pieces.push(&text[start..]);
    pieces
}

pub fn encode_employee(employee: &Employee) -> String {
    let calendar: Vec<String> = employee
        .ledger
        .entries()
        .map(|(key, kind)| format!("{}:{}", key.raw(), kind.code()))
        .collect();
    let trainings: Vec<String> = employee
        .trainings
        .iter()
        .map(|t| format!("{}~{}~{}", t.id, escape(&t.course), escape(&t.completed_on)))
        .collect();
    let notes: Vec<String> = employee
        .notes
        .iter()
        .map(|n| format!("{}~{}~{}", n.id, escape(&n.text), escape(&n.created_on)))
        .collect();

    [
        employee.id.to_string(),
        escape(&cipher::encrypt(&employee.name, cipher::SHIFT)),
        escape(&cipher::encrypt(&employee.department, cipher::SHIFT)),
        employee.annual_vacation_days.to_string(),
        calendar.join(&ENTRY_SEP.to_string()),
        trainings.join(&ITEM_SEP.to_string()),
        notes.join(&ITEM_SEP.to_string()),
    ]
    .join(&FIELD_SEP.to_string())
}

fn malformed(line: usize, reason: impl Into<String>) -> HrError {
    HrError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str, line: usize) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| malformed(line, format!("{what} is not a number: '{text}'")))
}

/// `id~text~date` items, as used by trainings and notes.
fn decode_items(field: &str, what: &str, line: usize) -> Result<Vec<(u32, String, String)>> {
    if field.is_empty() {
        return Ok(Vec::new());
    }
    split_escaped(field, ITEM_SEP)
        .into_iter()
        .map(|item| match split_escaped(item, PART_SEP).as_slice() {
            [id, text, date] => Ok((
                parse_number(id, &format!("{what} id"), line)?,
                unescape(text),
                unescape(date),
            )),
            _ => Err(malformed(line, format!("{what} entry '{item}' needs id~text~date"))),
        })
        .collect()
}

/// Parses one stored line. `line` is 1-based and only used in errors.
pub fn decode_employee(text: &str, line: usize) -> Result<Employee> {
    let fields = split_escaped(text, FIELD_SEP);
    if fields.len() != FIELD_COUNT {
        return Err(malformed(
            line,
            format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        ));
    }

    let id: u32 = parse_number(fields[0], "employee id", line)?;
    let name = cipher::decrypt(&unescape(fields[1]), cipher::SHIFT);
    let department = cipher::decrypt(&unescape(fields[2]), cipher::SHIFT);
    let allowance: u32 = parse_number(fields[3], "vacation allowance", line)?;
    let mut employee = Employee::new(id, name, department).with_allowance(allowance);

    if !fields[4].is_empty() {
        for entry in split_escaped(fields[4], ENTRY_SEP) {
            let (raw_key, code) = entry
                .split_once(':')
                .ok_or_else(|| malformed(line, format!("calendar entry '{entry}' has no ':'")))?;
            let key = DayKey::from_raw(parse_number(raw_key, "day key", line)?)
                .ok_or_else(|| malformed(line, format!("'{raw_key}' is not a valid date")))?;
            let mut code_chars = code.chars();
            let kind = match (code_chars.next(), code_chars.next()) {
                (Some(c), None) => MarkingKind::from_code(c),
                _ => None,
            }
            .ok_or_else(|| malformed(line, format!("unknown marking '{code}'")))?;
            employee
                .ledger
                .mark(key.to_date(), kind)
                .map_err(|e| malformed(line, e.to_string()))?;
        }
    }

    employee.trainings = decode_items(fields[5], "training", line)?
        .into_iter()
        .map(|(id, course, completed_on)| Training {
            id,
            course,
            completed_on,
        })
        .collect();
    employee.notes = decode_items(fields[6], "note", line)?
        .into_iter()
        .map(|(id, text, created_on)| Note {
            id,
            text,
            created_on,
        })
        .collect();

    Ok(employee)
}

/// Result of reading the data file.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub roster: Roster,
    /// Lines that could not be read back, in file order.
    pub skipped: Vec<HrError>,
}

/// Reads the roster, skipping lines that fail to parse.
///
/// A missing file is not an error: the system starts empty.
pub fn load_roster(path: &Path) -> Result<LoadReport> {
    if !path.exists() {
        warn!(path = %path.display(), "Data file not found, starting with an empty roster");
        return Ok(LoadReport::default());
    }

    let content = fs::read(path)?;
    let mut employees: Vec<Employee> = Vec::new();
    let mut skipped = Vec::new();

    for (index, raw) in content.split(|b| *b == b'\n').enumerate() {
        let line = index + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let decoded = std::str::from_utf8(raw)
            .map_err(|e| malformed(line, format!("not valid UTF-8: {e}")))
            .and_then(|text| {
                if text.trim().is_empty() {
                    Ok(None)
                } else {
                    decode_employee(text, line).map(Some)
                }
            });
        match decoded {
            Ok(None) => {}
            Ok(Some(employee)) if employees.iter().any(|e| e.id == employee.id) => {
                let err = malformed(line, format!("duplicate employee id {}", employee.id));
                warn!(line, error = %err, "Skipping record");
                skipped.push(err);
            }
            Ok(Some(employee)) => employees.push(employee),
            Err(err) => {
                warn!(line, error = %err, "Skipping record");
                skipped.push(err);
            }
        }
    }

    info!(
        path = %path.display(),
        employees = employees.len(),
        skipped = skipped.len(),
        "Roster loaded"
    );
    Ok(LoadReport {
        roster: Roster::from_employees(employees),
        skipped,
    })
}

/// Rewrites the whole data file.
///
/// The roster is written next to the target first and then renamed over it.
pub fn save_roster(path: &Path, roster: &Roster) -> Result<()> {
    let mut content = String::new();
    for employee in roster.employees() {
        content.push_str(&encode_employee(employee));
        content.push('\n');
    }

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let staging = path.with_extension("tmp");
        fs::write(&staging, &content)?;
        fs::rename(&staging, path)
    };

    match write() {
        Ok(()) => {
            info!(path = %path.display(), employees = roster.len(), "Roster saved");
            Ok(())
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to save roster");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::date::CalendarDate;
    use tempfile::TempDir;

    fn sample_employee() -> Employee {
        let mut employee = Employee::new(7, "Ana Silva", "RH").with_allowance(25);
        employee.mark_day(CalendarDate::new(15, 7, 2024), MarkingKind::Vacation).unwrap();
        employee.mark_day(CalendarDate::new(16, 7, 2024), MarkingKind::Absence).unwrap();
        employee.add_training("Rust", "01/02/2024");
        employee.add_note("Sem notas", "10/01/2024");
        employee
    }

    #[test]
    fn line_layout() {
        assert_eq!(
            encode_employee(&sample_employee()),
            "7;Dqd Vloyd;UK;25;20240715:F,20240716:X;1~Rust~01/02/2024;1~Sem notas~10/01/2024"
        );
    }

    #[test]
    fn empty_sections_are_blank() {
        let employee = Employee::new(1, "Bruno", "IT");
        assert_eq!(encode_employee(&employee), "1;Euxqr;LW;22;;;");
        assert_eq!(decode_employee("1;Euxqr;LW;22;;;", 1).unwrap(), employee);
    }

    #[test]
    fn separators_inside_free_text_survive() {
        let mut employee = Employee::new(3, "O'Neil; Jr|", "R&D, Lab~2");
        employee.add_training("C++ | avançado; parte 1", "1~2");
        employee.add_note("linha 1\nlinha 2 \\ fim", "11/11/2024");

        let line = encode_employee(&employee);
        assert!(!line.contains('\n'));
        assert_eq!(decode_employee(&line, 1).unwrap(), employee);
    }

    #[test]
    fn malformed_lines_are_reported() {
        let cases = [
            "abc;Dqd;UK;22;;;",
            "1;Dqd;UK;22;;",
            "1;Dqd;UK;lots;;;",
            "1;Dqd;UK;22;20240230:F;;",
            "1;Dqd;UK;22;20240715:Q;;",
            "1;Dqd;UK;22;20240714:F;;",
            "1;Dqd;UK;22;20240715;;",
            "1;Dqd;UK;22;;x~Rust~01/02/2024;",
            "1;Dqd;UK;22;;;1~only two",
        ];
        for case in cases {
            assert!(
                matches!(decode_employee(case, 4), Err(HrError::MalformedRecord { line: 4, .. })),
                "{case} should be rejected"
            );
        }
    }

    #[test]
    fn undecodable_bytes_only_cost_their_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rh_data.txt");
        let mut content = encode_employee(&sample_employee()).into_bytes();
        content.extend_from_slice(b"\n2;Mr\xe3r;UK;22;;;\n");
        fs::write(&path, content).unwrap();

        let report = load_roster(&path).unwrap();
        assert_eq!(report.roster.len(), 1);
        assert_eq!(report.roster.employees()[0], sample_employee());
        assert!(matches!(report.skipped[..], [HrError::MalformedRecord { line: 2, .. }]));
    }

    #[test]
    fn windows_line_endings_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rh_data.txt");
        let good = encode_employee(&sample_employee());
        fs::write(&path, format!("{good}\r\n1;Euxqr;LW;22;;;\r\n")).unwrap();

        let report = load_roster(&path).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.roster.len(), 2);
        assert_eq!(report.roster.employees()[0], sample_employee());
        assert_eq!(report.roster.employees()[1].name, "Bruno");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let report = load_roster(&dir.path().join("nothing.txt")).unwrap();
        assert!(report.roster.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("rh_data.txt");
        let mut roster = Roster::new();
        roster.add("Bruno", "IT", 22, false).unwrap();
        let roster = Roster::from_employees(
            roster
                .employees()
                .iter()
                .cloned()
                .chain(std::iter::once(sample_employee()))
                .collect(),
        );

        save_roster(&path, &roster).unwrap();
        assert!(!path.with_extension("tmp").exists());
        let report = load_roster(&path).unwrap();
        assert_eq!(report.roster, roster);
    }

    #[test]
    fn bad_lines_are_skipped_and_the_rest_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rh_data.txt");
        let good = encode_employee(&sample_employee());
        fs::write(&path, format!("{good}\n\ngarbage\n{good}\n1;Eu;LW;22;;;\n")).unwrap();

        let report = load_roster(&path).unwrap();
        assert_eq!(report.roster.len(), 2);
        assert_eq!(report.roster.employees()[0], sample_employee());
        assert_eq!(report.roster.employees()[1].name, "Br");
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(report.skipped[0], HrError::MalformedRecord { line: 3, .. }));
        assert!(matches!(report.skipped[1], HrError::MalformedRecord { line: 4, .. }));
    }
}
