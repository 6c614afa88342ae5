//! Calendar arithmetic shared by the date picker.
//!
//! Months are zero-based (`0 = January`) in [`MonthView`] to match the grid
//! layout; weekdays are Sunday-first.

use chrono::{Datelike, Local, Months, NaiveDate};
use std::sync::Arc;

pub const GRID_CELLS: usize = 42;
pub const GRID_COLUMNS: usize = 7;
pub const GRID_ROWS: usize = GRID_CELLS / GRID_COLUMNS;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of "today". Widgets hold one so tests can pin the date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub type SharedClock = Arc<dyn Clock>;

pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

pub fn today() -> NaiveDate {
    SystemClock.today()
}

// ── Canonical strings ─────────────────────────────────────────────────────────

/// `YYYY-MM-DD`, zero padded.
pub fn format_ymd(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parses a canonical date string. Empty or malformed input is "no date".
pub fn parse_ymd(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let mut parts = text.splitn(3, '-');
    let year = parts.next()?.parse::<i32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let day = parts.next()?.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Trigger label form, e.g. `Mar 15, 2024`.
pub fn display_date(date: NaiveDate) -> String {
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{} {}, {}", &month[..3], date.day(), date.year())
}

// ── Bounds ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateBounds {
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if self.min.is_some_and(|min| date < min) {
            return false;
        }
        if self.max.is_some_and(|max| date > max) {
            return false;
        }
        true
    }
}

// ── Month view ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    /// Always in `0..=11`.
    pub month0: u32,
}

impl MonthView {
    /// Normalizes `month0` past 11 into later years. Views saturate at the
    /// first and last month chrono can represent.
    pub fn new(year: i32, month0: u32) -> Self {
        Self::from_index(i64::from(year) * 12 + i64::from(month0))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    pub fn shifted(self, delta: i32) -> Self {
        Self::from_index(self.index() + i64::from(delta))
    }

    /// Months since January of year 0.
    fn index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month0)
    }

    fn from_index(index: i64) -> Self {
        let first = Self::of(NaiveDate::MIN).index();
        let last = Self::of(NaiveDate::MAX).index();
        let index = index.clamp(first, last);
        Self {
            year: index.div_euclid(12) as i32,
            month0: index.rem_euclid(12) as u32,
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    pub fn title(self) -> String {
        format!("{} {}", MONTH_NAMES[self.month0 as usize], self.year)
    }
}

pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let first = MonthView::new(year, month0).first_day();
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 31,
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: u32,
    pub date: NaiveDate,
    pub belongs_to_viewed_month: bool,
}

/// Six Sunday-first rows for the viewed month: leading days of the previous
/// month, every day of the month, then trailing days of the next month.
pub fn build_calendar(year: i32, month0: u32) -> [CalendarCell; GRID_CELLS] {
    let view = MonthView::new(year, month0);
    let first = view.first_day();
    let leading = first.weekday().num_days_from_sunday() as i64;
    let in_month = days_in_month(view.year, view.month0) as i64;

    std::array::from_fn(|index| {
        let offset = index as i64 - leading;
        let date = first
            .checked_add_signed(chrono::Duration::days(offset))
            .unwrap_or(first);
        CalendarCell {
            day: date.day(),
            date,
            belongs_to_viewed_month: (0..in_month).contains(&offset),
        }
    })
}

/// Grid index of `date` when it falls in the viewed month.
pub fn cell_index(cells: &[CalendarCell], date: NaiveDate) -> Option<usize> {
    cells
        .iter()
        .position(|cell| cell.belongs_to_viewed_month && cell.date == date)
}
