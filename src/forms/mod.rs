pub mod attendance;
pub mod screen;

pub use attendance::AttendanceForm;
pub use screen::AttendanceScreen;
