// Data file and CSV export behaviour on a real directory

#[cfg(test)]
mod persistence_test {
    use std::fs;

    use hrm_attendance::HrError;
    use hrm_attendance::api::attendance::mark_day;
    use hrm_attendance::api::export::{export_department_report, export_employee_calendar};
    use hrm_attendance::api::roster::Roster;
    use hrm_attendance::db::{load_roster, save_roster};
    use hrm_attendance::model::date::CalendarDate;
    use hrm_attendance::model::marking::MarkingKind;
    use tempfile::TempDir;

    fn populated() -> Roster {
        let mut roster = Roster::new();
        roster.add("Ana Silva", "Recursos Humanos", 22, false).unwrap();
        roster.add("Bruno Costa", "IT", 25, false).unwrap();
        mark_day(&mut roster, 1, CalendarDate::new(15, 7, 2024), MarkingKind::Vacation).unwrap();
        mark_day(&mut roster, 1, CalendarDate::new(17, 7, 2024), MarkingKind::Absence).unwrap();
        mark_day(&mut roster, 2, CalendarDate::new(2, 1, 2025), MarkingKind::Vacation).unwrap();
        let ana = roster.get_mut(1).unwrap();
        ana.add_training("Excel; avançado", "12/03/2024");
        ana.add_note("Entregou atestado, ver faltas", "18/07/2024");
        roster
    }

    #[test]
    fn roster_survives_a_restart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rh_data.txt");
        let roster = populated();

        save_roster(&path, &roster).unwrap();
        let loaded = load_roster(&path).unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.roster, roster);

        // names never hit the disk in clear text
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("Ana Silva"));
        assert!(raw.contains("20240715:F"));
    }

    #[test]
    fn one_broken_line_does_not_lose_the_others() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rh_data.txt");
        save_roster(&path, &populated()).unwrap();

        let mut raw = fs::read_to_string(&path).unwrap();
        raw.insert_str(0, "99;Broken;Line\n");
        fs::write(&path, raw).unwrap();

        let loaded = load_roster(&path).unwrap();
        assert_eq!(loaded.roster.len(), 2);
        assert!(matches!(loaded.skipped[..], [HrError::MalformedRecord { line: 1, .. }]));
    }

    #[test]
    fn exports_land_in_the_target_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("exports");
        let roster = populated();

        let calendar = export_employee_calendar(roster.get(1).unwrap(), &out).unwrap();
        let text = fs::read_to_string(&calendar).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().nth(2), Some("1,Ana Silva,Recursos Humanos,17/07/2024,X"));

        let report = export_department_report(&roster, "IT", 2025, &out).unwrap();
        assert_eq!(report, out.join("IT_relatorio_2025.csv"));
        assert_eq!(
            fs::read_to_string(report).unwrap().lines().nth(1),
            Some("IT,Bruno Costa,1,0,24")
        );
    }
}
