use super::attendance::{
    AttendanceForm, EMPLOYEE_FIELD, FILTER_ID, RECORDS_ID, STRIP_ID, SUMMARY_ID,
};
use crate::core::value::Value;
use crate::hr::{AttendanceLedger, AttendanceRecord, DashboardSource, Employee, EmployeeDirectory};
use crate::runtime::host::HostOutcome;
use crate::runtime::runner::{Flow, Screen};
use crate::terminal::{TerminalEvent, TerminalSize};
use crate::ui::renderer::RenderFrame;
use crate::widgets::shared::calendar::{SharedClock, WEEKDAY_NAMES, format_ymd};
use chrono::{Datelike, NaiveDate};

/// Attendance page: today's dashboard line, employee selection with a date
/// filter, that employee's records and the mark-attendance form.
pub struct AttendanceScreen<S> {
    title: String,
    form: AttendanceForm,
    service: S,
    employees: Vec<Employee>,
}

impl<S> AttendanceScreen<S>
where
    S: EmployeeDirectory + AttendanceLedger + DashboardSource,
{
    pub fn new(title: impl Into<String>, service: S, clock: SharedClock) -> Self {
        let employees = service.list_employees();
        let form = AttendanceForm::new(&employees, clock);
        let mut screen = Self {
            title: title.into(),
            form,
            service,
            employees,
        };
        screen.refresh();
        screen
    }

    pub fn form(&self) -> &AttendanceForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AttendanceForm {
        &mut self.form
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn into_service(self) -> S {
        self.service
    }

    /// Re-reads the service and rewrites every display node.
    pub fn refresh(&mut self) {
        self.employees = self.service.list_employees();
        let today = self.form.today();
        let summary = summary_text(&self.service, today);

        let selected = self
            .form
            .selected_employee()
            .and_then(|id| self.employees.iter().find(|e| e.employee_id == id));
        let (strip, records) = match selected {
            Some(employee) => {
                let filter = self.form.date_filter();
                let records = match self.service.records_for(&employee.employee_id, filter) {
                    Ok(records) => records_text(&records, filter),
                    Err(err) => {
                        tracing::warn!(
                            employee = %employee.employee_id,
                            error = %err,
                            "loading attendance records failed"
                        );
                        format!("  Could not load attendance records: {}", err)
                    }
                };
                (strip_text(employee), records)
            }
            None => (String::new(), String::new()),
        };

        let host = self.form.host_mut();
        host.set_output(SUMMARY_ID, Value::Text(summary));
        host.set_output(STRIP_ID, Value::Text(strip));
        host.set_output(RECORDS_ID, Value::Text(records));
    }

    /// Reacts to what the host reported for one event.
    pub fn apply_outcome(&mut self, outcome: HostOutcome) -> Flow {
        if outcome.exit {
            return Flow::Exit;
        }
        let mut render = outcome.render;
        let mut dirty = false;

        for change in &outcome.changes {
            match change.target.as_str() {
                EMPLOYEE_FIELD => {
                    self.form.clear_filter();
                    self.form.set_message(None, None);
                    dirty = true;
                }
                FILTER_ID => dirty = true,
                _ => {}
            }
        }

        if outcome.submit {
            if self.form.submit(&mut self.service).is_ok() {
                dirty = true;
            }
            render = true;
        }

        if dirty {
            self.refresh();
            render = true;
        }
        Flow::Continue { render }
    }
}

impl<S> Screen for AttendanceScreen<S>
where
    S: EmployeeDirectory + AttendanceLedger + DashboardSource,
{
    fn render(&mut self, size: TerminalSize) -> RenderFrame {
        let title = self.title.clone();
        self.form.host_mut().render(&title, size)
    }

    fn handle_event(&mut self, event: TerminalEvent) -> Flow {
        let outcome = match event {
            TerminalEvent::Key(key) => self.form.host_mut().handle_key(key),
            TerminalEvent::Pointer(pointer) => self.form.host_mut().handle_pointer(pointer),
            TerminalEvent::Resize(_) => return Flow::Continue { render: true },
            TerminalEvent::Tick => return Flow::Continue { render: false },
        };
        self.apply_outcome(outcome)
    }
}

fn summary_text(source: &dyn DashboardSource, today: NaiveDate) -> String {
    let summary = source.summary(today);
    let week: Vec<String> = source
        .trailing_week(today)
        .iter()
        .map(|day| {
            let weekday = WEEKDAY_NAMES[day.date.weekday().num_days_from_sunday() as usize];
            format!("{} {}/{}", weekday, day.present, day.absent)
        })
        .collect();
    let counts = format!(
        "{} · {} employees · {} present · {} absent · {} unmarked · {} records",
        format_ymd(today),
        summary.total_employees,
        summary.present_today,
        summary.absent_today,
        summary.unmarked_today,
        summary.total_attendance_records,
    );
    format!("{}\nLast 7 days (present/absent): {}", counts, week.join("  "))
}

fn strip_text(employee: &Employee) -> String {
    format!(
        "  {}  {}  {}  {} present days",
        employee.full_name, employee.employee_id, employee.department, employee.present_days
    )
}

fn records_text(records: &[AttendanceRecord], filter: Option<NaiveDate>) -> String {
    if records.is_empty() {
        let detail = match filter {
            Some(date) => format!("No records for {}.", format_ymd(date)),
            None => "No attendance has been marked for this employee.".to_string(),
        };
        return format!("  No attendance records. {}", detail);
    }
    let mut lines = vec![format!(
        "  {:>3}  {:<10}  {:<7}  {}",
        "#", "Date", "Status", "Marked At"
    )];
    lines.extend(records.iter().enumerate().map(|(index, record)| {
        format!(
            "  {:>3}  {:<10}  {:<7}  {}",
            index + 1,
            format_ymd(record.date),
            record.status.as_str(),
            record.marked_at.format("%Y-%m-%d %H:%M"),
        )
    }));
    lines.join("\n")
}
