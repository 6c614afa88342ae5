use super::models::{
    AttendanceRecord, DailyCount, DashboardSummary, Employee, MarkAttendance, NewEmployee,
};
use crate::error::Result;
use chrono::NaiveDate;

pub trait EmployeeDirectory {
    /// Newest first, with `present_days` filled in.
    fn list_employees(&self) -> Vec<Employee>;
    fn create_employee(&mut self, new: NewEmployee) -> Result<Employee>;
    /// Removes the employee and every attendance record they own.
    fn delete_employee(&mut self, employee_id: &str) -> Result<()>;
}

pub trait AttendanceLedger {
    fn mark(&mut self, request: MarkAttendance) -> Result<AttendanceRecord>;
    /// Records of one employee, newest date first, optionally limited to `date`.
    fn records_for(
        &self,
        employee_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>>;
}

pub trait DashboardSource {
    fn summary(&self, day: NaiveDate) -> DashboardSummary;
    /// Seven daily counts ending on `end`, oldest first.
    fn trailing_week(&self, end: NaiveDate) -> Vec<DailyCount>;
}
