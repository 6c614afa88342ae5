use super::models::{
    AttendanceRecord, AttendanceStatus, DailyCount, DashboardSummary, Employee, MarkAttendance,
    NewEmployee,
};
use super::service::{AttendanceLedger, DashboardSource, EmployeeDirectory};
use crate::error::{
    DuplicateAttendanceSnafu, DuplicateEmployeeSnafu, EmployeeNotFoundSnafu, InvalidSnafu, Result,
};
use crate::widgets::shared::calendar::format_ymd;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, SubsecRound};
use snafu::ensure;

/// Directory, ledger and dashboard backed by plain vectors.
#[derive(Debug, Default)]
pub struct InMemoryHr {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    next_employee: u64,
    next_record: u64,
    fixed_now: Option<NaiveDateTime>,
}

impl InMemoryHr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `created_at` / `marked_at` timestamps.
    pub fn with_fixed_now(mut self, now: NaiveDateTime) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> NaiveDateTime {
        self.fixed_now
            .unwrap_or_else(|| Local::now().naive_local().trunc_subsecs(0))
    }

    fn find(&self, employee_id: &str) -> Result<&Employee> {
        let employee_id = employee_id.trim();
        self.employees
            .iter()
            .find(|employee| employee.employee_id == employee_id)
            .ok_or_else(|| {
                EmployeeNotFoundSnafu {
                    employee_id: employee_id.to_string(),
                }
                .build()
            })
    }

    fn present_days(&self, row_id: u64) -> u32 {
        self.attendance
            .iter()
            .filter(|record| {
                record.employee_id == row_id && record.status == AttendanceStatus::Present
            })
            .count() as u32
    }

    fn count_on(&self, day: NaiveDate, status: AttendanceStatus) -> u32 {
        self.attendance
            .iter()
            .filter(|record| record.date == day && record.status == status)
            .count() as u32
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    pub fn record_count(&self) -> usize {
        self.attendance.len()
    }

    /// Creates an employee with an explicit `created_at`; used for seeding.
    pub fn create_employee_at(
        &mut self,
        new: NewEmployee,
        created_at: NaiveDateTime,
    ) -> Result<Employee> {
        let employee_id = required_field("Employee ID", &new.employee_id)?;
        let full_name = required_field("Full name", &new.full_name)?;
        let department = required_field("Department", &new.department)?;
        let email = valid_email(&new.email)?;

        ensure!(
            !self.employees.iter().any(|e| e.employee_id == employee_id),
            DuplicateEmployeeSnafu {
                field: "ID",
                value: employee_id.clone(),
            }
        );
        ensure!(
            !self
                .employees
                .iter()
                .any(|e| e.email.eq_ignore_ascii_case(&email)),
            DuplicateEmployeeSnafu {
                field: "email",
                value: email.clone(),
            }
        );

        self.next_employee += 1;
        let employee = Employee {
            id: self.next_employee,
            employee_id,
            full_name,
            email,
            department,
            created_at,
            present_days: 0,
        };
        tracing::info!(employee = %employee.employee_id, "employee created");
        self.employees.push(employee.clone());
        Ok(employee)
    }
}

fn required_field(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    ensure!(
        !value.is_empty(),
        InvalidSnafu {
            message: format!("{field} cannot be empty."),
        }
    );
    Ok(value.to_string())
}

fn valid_email(value: &str) -> Result<String> {
    let value = value.trim();
    let well_formed = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    ensure!(
        well_formed,
        InvalidSnafu {
            message: format!("'{value}' is not a valid email address."),
        }
    );
    Ok(value.to_string())
}

impl EmployeeDirectory for InMemoryHr {
    fn list_employees(&self) -> Vec<Employee> {
        let mut out: Vec<Employee> = self
            .employees
            .iter()
            .map(|employee| Employee {
                present_days: self.present_days(employee.id),
                ..employee.clone()
            })
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        out
    }

    fn create_employee(&mut self, new: NewEmployee) -> Result<Employee> {
        let now = self.now();
        self.create_employee_at(new, now)
    }

    fn delete_employee(&mut self, employee_id: &str) -> Result<()> {
        let row_id = self.find(employee_id)?.id;
        self.employees.retain(|employee| employee.id != row_id);
        let before = self.attendance.len();
        self.attendance.retain(|record| record.employee_id != row_id);
        tracing::info!(
            employee = employee_id,
            removed_records = before - self.attendance.len(),
            "employee deleted"
        );
        Ok(())
    }
}

impl AttendanceLedger for InMemoryHr {
    fn mark(&mut self, request: MarkAttendance) -> Result<AttendanceRecord> {
        let employee = self.find(&request.employee_id)?;
        let (row_id, str_id, full_name) = (
            employee.id,
            employee.employee_id.clone(),
            employee.full_name.clone(),
        );
        ensure!(
            !self
                .attendance
                .iter()
                .any(|record| record.employee_id == row_id && record.date == request.date),
            DuplicateAttendanceSnafu {
                employee_id: str_id.clone(),
                date: format_ymd(request.date),
            }
        );

        self.next_record += 1;
        let record = AttendanceRecord {
            id: self.next_record,
            employee_id: row_id,
            employee_str_id: str_id,
            full_name,
            date: request.date,
            status: request.status,
            marked_at: self.now(),
        };
        tracing::info!(
            employee = %record.employee_str_id,
            date = %format_ymd(record.date),
            status = %record.status,
            "attendance marked"
        );
        self.attendance.push(record.clone());
        Ok(record)
    }

    fn records_for(
        &self,
        employee_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        let row_id = self.find(employee_id)?.id;
        let mut out: Vec<AttendanceRecord> = self
            .attendance
            .iter()
            .filter(|record| record.employee_id == row_id)
            .filter(|record| date.is_none_or(|day| record.date == day))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }
}

impl DashboardSource for InMemoryHr {
    fn summary(&self, day: NaiveDate) -> DashboardSummary {
        let total_employees = self.employees.len() as u32;
        let present_today = self.count_on(day, AttendanceStatus::Present);
        let absent_today = self.count_on(day, AttendanceStatus::Absent);
        DashboardSummary {
            total_employees,
            present_today,
            absent_today,
            unmarked_today: total_employees.saturating_sub(present_today + absent_today),
            total_attendance_records: self.attendance.len() as u32,
        }
    }

    fn trailing_week(&self, end: NaiveDate) -> Vec<DailyCount> {
        (0..7i64)
            .rev()
            .filter_map(|back| end.checked_sub_signed(Duration::days(back)))
            .map(|date| DailyCount {
                date,
                present: self.count_on(date, AttendanceStatus::Present),
                absent: self.count_on(date, AttendanceStatus::Absent),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryHr;
    use crate::error::Error;
    use crate::hr::models::{AttendanceStatus, MarkAttendance, NewEmployee};
    use crate::hr::service::{AttendanceLedger, DashboardSource, EmployeeDirectory};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn seeded() -> InMemoryHr {
        let mut hr = InMemoryHr::new();
        hr.create_employee(NewEmployee::new(
            "EMP001",
            "Aarav Sharma",
            "aarav@hrms.in",
            "Engineering",
        ))
        .expect("create EMP001");
        hr.create_employee(NewEmployee::new(
            "EMP002",
            "Priya Patel",
            "priya@hrms.in",
            "Design",
        ))
        .expect("create EMP002");
        hr
    }

    fn mark(hr: &mut InMemoryHr, id: &str, day: NaiveDate, status: AttendanceStatus) {
        hr.mark(MarkAttendance {
            employee_id: id.to_string(),
            date: day,
            status,
        })
        .expect("mark");
    }

    #[test]
    fn create_trims_and_validates() {
        let mut hr = InMemoryHr::new();
        let created = hr
            .create_employee(NewEmployee::new(" EMP009 ", " Kavya ", "k@x.in", " HR "))
            .expect("create");
        assert_eq!(created.employee_id, "EMP009");
        assert_eq!(created.full_name, "Kavya");
        assert_eq!(created.department, "HR");

        let err = hr
            .create_employee(NewEmployee::new("EMP010", "  ", "a@b.c", "HR"))
            .expect_err("empty name");
        assert!(matches!(err, Error::Invalid { .. }));

        let err = hr
            .create_employee(NewEmployee::new("EMP010", "A", "nope", "HR"))
            .expect_err("bad email");
        assert!(matches!(err, Error::Invalid { .. }));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut hr = seeded();
        let err = hr
            .create_employee(NewEmployee::new("EMP001", "X", "x@y.z", "HR"))
            .expect_err("dup id");
        assert!(matches!(err, Error::DuplicateEmployee { field: "ID", .. }));

        let err = hr
            .create_employee(NewEmployee::new("EMP003", "X", "AARAV@hrms.in", "HR"))
            .expect_err("dup email");
        assert!(matches!(err, Error::DuplicateEmployee { field: "email", .. }));
    }

    #[test]
    fn mark_rejects_unknown_and_duplicate() {
        let mut hr = seeded();
        let day = date(2024, 3, 15);
        mark(&mut hr, "EMP001", day, AttendanceStatus::Present);

        let err = hr
            .mark(MarkAttendance {
                employee_id: "EMP001".to_string(),
                date: day,
                status: AttendanceStatus::Absent,
            })
            .expect_err("duplicate");
        assert_eq!(
            err.to_string(),
            "Attendance for 'EMP001' on 2024-03-15 already marked."
        );

        let err = hr
            .mark(MarkAttendance {
                employee_id: "EMP404".to_string(),
                date: day,
                status: AttendanceStatus::Present,
            })
            .expect_err("unknown");
        assert!(matches!(err, Error::EmployeeNotFound { .. }));
    }

    #[test]
    fn records_are_newest_first_and_filterable() {
        let mut hr = seeded();
        mark(&mut hr, "EMP001", date(2024, 3, 14), AttendanceStatus::Present);
        mark(&mut hr, "EMP001", date(2024, 3, 16), AttendanceStatus::Absent);
        mark(&mut hr, "EMP002", date(2024, 3, 16), AttendanceStatus::Present);

        let records = hr.records_for("EMP001", None).expect("records");
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 16), date(2024, 3, 14)]);
        assert_eq!(records[0].employee_str_id, "EMP001");
        assert_eq!(records[0].full_name, "Aarav Sharma");

        let filtered = hr
            .records_for("EMP001", Some(date(2024, 3, 14)))
            .expect("filtered");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn delete_cascades_and_present_days_are_derived() {
        let mut hr = seeded();
        mark(&mut hr, "EMP001", date(2024, 3, 14), AttendanceStatus::Present);
        mark(&mut hr, "EMP001", date(2024, 3, 15), AttendanceStatus::Present);
        mark(&mut hr, "EMP001", date(2024, 3, 16), AttendanceStatus::Absent);
        mark(&mut hr, "EMP002", date(2024, 3, 16), AttendanceStatus::Present);

        let listed = hr.list_employees();
        let aarav = listed
            .iter()
            .find(|e| e.employee_id == "EMP001")
            .expect("listed");
        assert_eq!(aarav.present_days, 2);

        hr.delete_employee("EMP001").expect("delete");
        assert_eq!(hr.employee_count(), 1);
        assert_eq!(hr.record_count(), 1);
        assert!(matches!(
            hr.delete_employee("EMP001"),
            Err(Error::EmployeeNotFound { .. })
        ));
    }

    #[test]
    fn dashboard_counts_unmarked_and_week() {
        let mut hr = seeded();
        let today = date(2024, 3, 16);
        mark(&mut hr, "EMP001", today, AttendanceStatus::Absent);
        mark(&mut hr, "EMP002", date(2024, 3, 10), AttendanceStatus::Present);

        let summary = hr.summary(today);
        assert_eq!(summary.total_employees, 2);
        assert_eq!(summary.absent_today, 1);
        assert_eq!(summary.present_today, 0);
        assert_eq!(summary.unmarked_today, 1);
        assert_eq!(summary.total_attendance_records, 2);

        let week = hr.trailing_week(today);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date(2024, 3, 10));
        assert_eq!(week[0].present, 1);
        assert_eq!(week[6].date, today);
        assert_eq!(week[6].absent, 1);
    }
}
