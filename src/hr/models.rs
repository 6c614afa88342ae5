use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub present_days: u32,
}

impl Employee {
    /// Label used in pickers, e.g. `Aarav Sharma (EMP001)`.
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.full_name, self.employee_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
}

impl NewEmployee {
    pub fn new(
        employee_id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 2] = [AttendanceStatus::Present, AttendanceStatus::Absent];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: u64,
    /// Numeric id of the employee row.
    pub employee_id: u64,
    /// Human-readable employee id (`EMP001`).
    #[serde(default)]
    pub employee_str_id: String,
    #[serde(default)]
    pub full_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_employees: u32,
    pub present_today: u32,
    pub absent_today: u32,
    pub unmarked_today: u32,
    pub total_attendance_records: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub present: u32,
    pub absent: u32,
}

#[cfg(test)]
mod tests {
    use super::AttendanceStatus;

    #[test]
    fn status_uses_capitalized_wire_names() {
        let json = serde_json::to_string(&AttendanceStatus::Absent).expect("serialize");
        assert_eq!(json, "\"Absent\"");
        assert_eq!(AttendanceStatus::parse(" present"), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::parse("late"), None);
    }
}
