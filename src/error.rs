//! Crate-wide error type.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Rejected input (empty field, malformed email, bad date).
    #[snafu(display("{message}"))]
    Invalid { message: String },

    #[snafu(display("Employee '{employee_id}' not found."))]
    EmployeeNotFound { employee_id: String },

    #[snafu(display("Employee with {field} '{value}' already exists."))]
    DuplicateEmployee { field: &'static str, value: String },

    #[snafu(display("Attendance for '{employee_id}' on {date} already marked."))]
    DuplicateAttendance { employee_id: String, date: String },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    #[snafu(display("Config parse error: {source}"))]
    Yaml { source: serde_yaml::Error },

    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Error::Yaml { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
