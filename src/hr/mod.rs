pub mod memory;
pub mod models;
pub mod service;

pub use memory::InMemoryHr;
pub use models::{
    AttendanceRecord, AttendanceStatus, DailyCount, DashboardSummary, Employee, MarkAttendance,
    NewEmployee,
};
pub use service::{AttendanceLedger, DashboardSource, EmployeeDirectory};
