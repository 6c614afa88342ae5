//! YAML seed configuration.
//!
//! ```yaml
//! title: Mark attendance
//! employees:
//!   - employee_id: EMP001
//!     full_name: Aarav Sharma
//!     email: aarav.sharma@hrms.in
//!     department: Engineering
//! attendance:
//!   - employee_id: EMP001
//!     date: 2024-03-15
//!     status: Present
//! ```

use crate::error::Result;
use crate::hr::{AttendanceLedger, AttendanceStatus, InMemoryHr, MarkAttendance, NewEmployee};
use chrono::{Local, NaiveDate, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    #[serde(default = "default_status")]
    pub status: AttendanceStatus,
}

fn default_status() -> AttendanceStatus {
    AttendanceStatus::Present
}

fn default_title() -> String {
    "Mark attendance".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub employees: Vec<NewEmployee>,
    #[serde(default)]
    pub attendance: Vec<SeedAttendance>,
}

impl Default for Config {
    fn default() -> Self {
        let employees = [
            ("EMP001", "Aarav Sharma", "aarav.sharma@hrms.in", "Engineering"),
            ("EMP002", "Priya Patel", "priya.patel@hrms.in", "Engineering"),
            ("EMP005", "Vikram Singh", "vikram.singh@hrms.in", "Design"),
            ("EMP008", "Kavya Iyer", "kavya.iyer@hrms.in", "Marketing"),
            ("EMP011", "Rahul Verma", "rahul.verma@hrms.in", "Finance"),
            ("EMP014", "Deepika Rao", "deepika.rao@hrms.in", "HR"),
            ("EMP016", "Pooja Deshmukh", "pooja.deshmukh@hrms.in", "Operations"),
        ]
        .into_iter()
        .map(|(id, name, email, dept)| NewEmployee::new(id, name, email, dept))
        .collect();

        Self {
            title: default_title(),
            employees,
            attendance: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::info!(
            path = %path.display(),
            employees = config.employees.len(),
            attendance = config.attendance.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Loads `path` when given, otherwise the built-in seed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Builds the in-memory service from this config. Seed entries go through
    /// the same validation as interactive input and share one `created_at`,
    /// so they list in file order.
    pub fn build_hr(&self) -> Result<InMemoryHr> {
        let mut hr = InMemoryHr::new();
        let seeded_at = Local::now().naive_local().trunc_subsecs(0);
        for employee in &self.employees {
            hr.create_employee_at(employee.clone(), seeded_at)?;
        }
        for seed in &self.attendance {
            hr.mark(MarkAttendance {
                employee_id: seed.employee_id.clone(),
                date: seed.date,
                status: seed.status,
            })?;
        }
        Ok(hr)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::error::Error;
    use crate::hr::{AttendanceLedger, AttendanceStatus, EmployeeDirectory};

    #[test]
    fn yaml_seed_builds_service() {
        let config = Config::from_yaml(
            r#"
employees:
  - employee_id: EMP001
    full_name: Aarav Sharma
    email: aarav@hrms.in
    department: Engineering
attendance:
  - employee_id: EMP001
    date: 2024-03-15
  - employee_id: EMP001
    date: 2024-03-16
    status: Absent
"#,
        )
        .expect("parse yaml");
        assert_eq!(config.title, "Mark attendance");

        let hr = config.build_hr().expect("build");
        assert_eq!(hr.list_employees().len(), 1);
        let records = hr.records_for("EMP001", None).expect("records");
        assert_eq!(records[0].status, AttendanceStatus::Absent);
        assert_eq!(records[1].status, AttendanceStatus::Present);
    }

    #[test]
    fn seed_attendance_for_unknown_employee_fails() {
        let config = Config::from_yaml(
            "attendance:\n  - employee_id: EMP404\n    date: 2024-03-15\n",
        )
        .expect("parse yaml");
        assert!(matches!(
            config.build_hr(),
            Err(Error::EmployeeNotFound { .. })
        ));
    }

    #[test]
    fn default_seed_is_valid_and_listed_in_order() {
        let hr = Config::default().build_hr().expect("default seed");
        assert_eq!(hr.employee_count(), 7);
        let listed = hr.list_employees();
        assert_eq!(listed[0].employee_id, "EMP001");
        assert_eq!(listed[6].employee_id, "EMP016");
    }
}
