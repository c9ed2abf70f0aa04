use serde::Serialize;
use strum::{Display, EnumIter};

/// What a calendar day holds for one employee.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize)]
pub enum MarkingKind {
    Free,
    Vacation,
    Absence,
    /// Derived from the weekday, never stored.
    Weekend,
}

impl MarkingKind {
    /// Single-character marker used on disk, in CSV exports and in the calendar grid.
    pub fn code(self) -> char {
        match self {
            MarkingKind::Free => ' ',
            MarkingKind::Vacation => 'F',
            MarkingKind::Absence => 'X',
            MarkingKind::Weekend => 'S',
        }
    }

    /// Parses a stored marker. Only user-set kinds exist on disk.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'F' => Some(MarkingKind::Vacation),
            'X' => Some(MarkingKind::Absence),
            _ => None,
        }
    }

    /// Kinds the operator is allowed to write into a ledger.
    pub fn is_markable(self) -> bool {
        matches!(self, MarkingKind::Vacation | MarkingKind::Absence)
    }
}
