use crate::core::value::Value;
use crate::hr::{AttendanceLedger, AttendanceRecord, AttendanceStatus, Employee, MarkAttendance};
use crate::runtime::host::FormHost;
use crate::ui::style::{Color, Style};
use crate::widgets::components::{CalendarPicker, SelectDropdown, SelectOption};
use crate::widgets::node::Node;
use crate::widgets::outputs::text::Text;
use crate::widgets::shared::calendar::{Clock, SharedClock, format_ymd, parse_ymd};
use crate::widgets::validators::required;
use chrono::NaiveDate;

pub const SUMMARY_ID: &str = "summary";
pub const EMPLOYEE_ID: &str = "employee";
pub const FILTER_ID: &str = "filter";
pub const STRIP_ID: &str = "strip";
pub const RECORDS_ID: &str = "records";
pub const MARK_HEADER_ID: &str = "mark_header";
pub const DATE_ID: &str = "date";
pub const STATUS_ID: &str = "status";
pub const ERROR_ID: &str = "error";
pub const NOTICE_ID: &str = "notice";
pub const HELP_ID: &str = "help";

/// Store key of the employee dropdown.
pub const EMPLOYEE_FIELD: &str = "employee_id";

pub const DATE_REQUIRED: &str = "Date is required. Pick a date and try again.";
pub const EMPLOYEE_REQUIRED: &str = "Select an employee.";
pub const MARKED: &str = "Attendance marked successfully!";

/// Employee selector, date filter and the mark-attendance fields, all in one
/// focus ring.
pub struct AttendanceForm {
    host: FormHost,
    clock: SharedClock,
}

impl AttendanceForm {
    pub fn new(employees: &[Employee], clock: SharedClock) -> Self {
        let today = format_ymd(clock.today());
        let options: Vec<SelectOption> = employees
            .iter()
            .map(|employee| {
                SelectOption::new(employee.employee_id.clone(), employee.option_label())
            })
            .collect();
        let mut employee = SelectDropdown::new(EMPLOYEE_ID, "Select Employee", options)
            .with_name(EMPLOYEE_FIELD)
            .with_placeholder("Select employee")
            .with_validator(required(EMPLOYEE_REQUIRED));
        if let Some(first) = employees.first() {
            employee = employee.with_value(first.employee_id.clone());
        }

        let statuses = AttendanceStatus::ALL
            .into_iter()
            .map(|status| SelectOption::plain(status.as_str()))
            .collect();

        let dim = Style::new().color(Color::DarkGrey);
        let nodes = vec![
            Node::output(Text::new(SUMMARY_ID, "").with_style(dim)),
            Node::input(employee),
            Node::input(
                CalendarPicker::new(FILTER_ID, "Filter by Date")
                    .with_clock(clock.clone())
                    .with_placeholder("All dates"),
            ),
            Node::output(Text::new(STRIP_ID, "")),
            Node::output(Text::new(RECORDS_ID, "")),
            Node::output(
                Text::new(MARK_HEADER_ID, "\nMark Attendance")
                    .with_style(Style::new().color(Color::Cyan).bold()),
            ),
            Node::input(
                CalendarPicker::new(DATE_ID, "Date")
                    .with_clock(clock.clone())
                    .with_max(&today)
                    .with_value(today.clone())
                    .with_autofocus(true)
                    .with_validator(required(DATE_REQUIRED)),
            ),
            Node::input(
                SelectDropdown::new(STATUS_ID, "Status", statuses)
                    .with_value(AttendanceStatus::Present.as_str()),
            ),
            Node::output(Text::new(ERROR_ID, "").with_style(Style::new().color(Color::Red))),
            Node::output(
                Text::new(NOTICE_ID, "").with_style(Style::new().color(Color::Green)),
            ),
            Node::output(
                Text::new(HELP_ID, "\nTab next · Shift+Tab back · Ctrl+S mark · Ctrl+C quit")
                    .with_style(dim),
            ),
        ];

        Self {
            host: FormHost::new(nodes),
            clock,
        }
    }

    pub fn host(&self) -> &FormHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut FormHost {
        &mut self.host
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn selected_employee(&self) -> Option<String> {
        Some(self.host.text(EMPLOYEE_FIELD)).filter(|id| !id.is_empty())
    }

    pub fn date_filter(&self) -> Option<NaiveDate> {
        parse_ymd(&self.host.text(FILTER_ID))
    }

    pub fn clear_filter(&mut self) {
        self.host.set_value(FILTER_ID, Value::None);
    }

    pub fn set_message(&mut self, error: Option<&str>, notice: Option<&str>) {
        self.host
            .set_output(ERROR_ID, Value::from(error.unwrap_or_default()));
        self.host
            .set_output(NOTICE_ID, Value::from(notice.unwrap_or_default()));
    }

    /// Validates the mark fields and records them in `ledger`.
    ///
    /// A missing date is reported before a missing employee. Service errors
    /// come back as their display text. On success the date goes back to
    /// today and the status to `Present`.
    pub fn submit(
        &mut self,
        ledger: &mut dyn AttendanceLedger,
    ) -> Result<AttendanceRecord, String> {
        if !self.host.validate() {
            let message = [DATE_ID, EMPLOYEE_ID]
                .into_iter()
                .find_map(|id| self.host.visible_error(id))
                .unwrap_or(DATE_REQUIRED)
                .to_string();
            self.set_message(Some(&message), None);
            return Err(message);
        }

        let (Some(employee_id), Some(date)) =
            (self.selected_employee(), parse_ymd(&self.host.text(DATE_ID)))
        else {
            self.set_message(Some(DATE_REQUIRED), None);
            return Err(DATE_REQUIRED.to_string());
        };
        let status = AttendanceStatus::parse(&self.host.text(STATUS_ID))
            .unwrap_or(AttendanceStatus::Present);

        match ledger.mark(MarkAttendance {
            employee_id,
            date,
            status,
        }) {
            Ok(record) => {
                self.reset();
                self.set_message(None, Some(MARKED));
                Ok(record)
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(error = %message, "mark attendance rejected");
                self.set_message(Some(&message), None);
                Err(message)
            }
        }
    }

    pub fn reset(&mut self) {
        let today = format_ymd(self.clock.today());
        self.host.set_value(DATE_ID, Value::Text(today));
        self.host
            .set_value(STATUS_ID, Value::from(AttendanceStatus::Present.as_str()));
        self.host.clear_errors();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AttendanceForm, DATE_ID, DATE_REQUIRED, EMPLOYEE_FIELD, EMPLOYEE_REQUIRED, STATUS_ID,
    };
    use crate::core::value::Value;
    use crate::hr::{
        AttendanceLedger, AttendanceStatus, EmployeeDirectory, InMemoryHr, NewEmployee,
    };
    use crate::widgets::shared::calendar::FixedClock;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn service() -> InMemoryHr {
        let mut hr = InMemoryHr::new();
        hr.create_employee(NewEmployee::new(
            "EMP001",
            "Aarav Sharma",
            "a@hrms.in",
            "Engineering",
        ))
        .expect("create");
        hr
    }

    fn form(hr: &InMemoryHr) -> AttendanceForm {
        let clock = Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date"),
        ));
        AttendanceForm::new(&hr.list_employees(), clock)
    }

    #[test]
    fn defaults_to_first_employee_today_and_present() {
        let hr = service();
        let form = form(&hr);
        assert_eq!(form.host().text(EMPLOYEE_FIELD), "EMP001");
        assert_eq!(form.host().text(DATE_ID), "2024-03-15");
        assert_eq!(form.host().text(STATUS_ID), "Present");
        assert_eq!(form.host().focused_id(), Some(DATE_ID));
    }

    #[test]
    fn missing_date_is_reported_first() {
        let mut hr = service();
        let mut form = form(&hr);
        form.host_mut().set_value(DATE_ID, Value::None);
        form.host_mut().set_value(EMPLOYEE_FIELD, Value::None);
        assert_eq!(form.submit(&mut hr), Err(DATE_REQUIRED.to_string()));

        form.host_mut().set_value(DATE_ID, Value::from("2024-03-14"));
        assert_eq!(form.submit(&mut hr), Err(EMPLOYEE_REQUIRED.to_string()));
        assert_eq!(hr.record_count(), 0);
    }

    #[test]
    fn submit_marks_and_resets() {
        let mut hr = service();
        let mut form = form(&hr);
        form.host_mut().set_value(DATE_ID, Value::from("2024-03-12"));
        form.host_mut().set_value(STATUS_ID, Value::from("Absent"));

        let record = form.submit(&mut hr).expect("marked");
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(form.host().text(DATE_ID), "2024-03-15");
        assert_eq!(form.host().text(STATUS_ID), "Present");

        let records = hr.records_for("EMP001", None).expect("records");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn service_errors_surface_as_message() {
        let mut hr = service();
        let mut form = form(&hr);
        form.submit(&mut hr).expect("first mark");
        let err = form.submit(&mut hr).expect_err("duplicate");
        assert_eq!(err, "Attendance for 'EMP001' on 2024-03-15 already marked.");
    }
}
