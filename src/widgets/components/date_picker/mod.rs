mod layout;
mod render;

use crate::core::value::Value;
use crate::runtime::listeners::{OutsideListener, PointerListeners};
use crate::terminal::{KeyCode, KeyEvent, PointerEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use crate::widgets::shared::calendar::{
    self, CalendarCell, Clock, DateBounds, GRID_CELLS, MonthView, SharedClock, build_calendar,
    cell_index, days_in_month, format_ymd, parse_ymd,
};
use crate::widgets::traits::{
    DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
};
use crate::widgets::validators::{Validator, run_validators};
use chrono::{Datelike, Duration, NaiveDate};
use layout::{Hit, hit_test};
use render::{PanelView, panel_lines};

/// Transient state that only exists while the panel is open. Dropping it
/// releases the outside-pointer registration.
struct OpenPanel {
    cursor: NaiveDate,
    _listener: OutsideListener,
}

/// Controlled month-grid date picker bound to a `YYYY-MM-DD` value.
pub struct CalendarPicker {
    base: InputBase,
    raw_value: String,
    selected: Option<NaiveDate>,
    view: MonthView,
    bounds: DateBounds,
    placeholder: String,
    disabled: bool,
    autofocus: bool,
    panel: Option<OpenPanel>,
    listeners: PointerListeners,
    clock: SharedClock,
    validators: Vec<Validator>,
}

impl CalendarPicker {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let clock = calendar::system_clock();
        let view = MonthView::of(clock.today());
        Self {
            base: InputBase::new(id, label),
            raw_value: String::new(),
            selected: None,
            view,
            bounds: DateBounds::default(),
            placeholder: "Pick a date".to_string(),
            disabled: false,
            autofocus: false,
            panel: None,
            listeners: PointerListeners::new(),
            clock,
            validators: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        if self.selected.is_none() {
            self.view = MonthView::of(self.clock.today());
        }
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(Value::Text(value.into()));
        self
    }

    /// Lower bound as a canonical date string; unparsable means unbounded.
    pub fn with_min(mut self, min: &str) -> Self {
        self.bounds.min = parse_ymd(min);
        self
    }

    pub fn with_max(mut self, max: &str) -> Self {
        self.bounds.max = parse_ymd(max);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.set_disabled(disabled);
        self
    }

    pub fn with_autofocus(mut self, autofocus: bool) -> Self {
        self.autofocus = autofocus;
        self
    }

    pub fn with_listeners(mut self, listeners: PointerListeners) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close();
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected
    }

    pub fn view(&self) -> MonthView {
        self.view
    }

    pub fn bounds(&self) -> DateBounds {
        self.bounds
    }

    pub fn cursor(&self) -> Option<NaiveDate> {
        self.panel.as_ref().map(|panel| panel.cursor)
    }

    pub fn cells(&self) -> [CalendarCell; GRID_CELLS] {
        build_calendar(self.view.year, self.view.month0)
    }

    /// Grid index of `day` in the viewed month.
    pub fn index_of_day(&self, day: u32) -> Option<usize> {
        let date = NaiveDate::from_ymd_opt(self.view.year, self.view.month0 + 1, day)?;
        cell_index(&self.cells(), date)
    }

    // ── Operations ────────────────────────────────────────────────────────────

    pub fn open(&mut self) {
        if self.disabled || self.panel.is_some() {
            return;
        }
        let cursor = self.initial_cursor();
        self.panel = Some(OpenPanel {
            cursor,
            _listener: self.listeners.register(self.base.id()),
        });
    }

    pub fn close(&mut self) {
        self.panel = None;
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Moves the viewed month; the value is untouched.
    pub fn navigate_month(&mut self, delta: i32) {
        self.view = self.view.shifted(delta);
        let view = self.view;
        if let Some(panel) = self.panel.as_mut() {
            let day = panel.cursor.day().min(days_in_month(view.year, view.month0));
            panel.cursor = NaiveDate::from_ymd_opt(view.year, view.month0 + 1, day)
                .unwrap_or_else(|| view.first_day());
        }
    }

    /// Commits the cell's date. Cells of adjacent months and dates outside
    /// the bounds are inert: nothing is emitted and the panel stays as is.
    pub fn select_cell(&mut self, index: usize) -> InteractionResult {
        let cells = self.cells();
        let Some(cell) = cells.get(index) else {
            return InteractionResult::ignored();
        };
        if !cell.belongs_to_viewed_month || !self.bounds.contains(cell.date) {
            return InteractionResult::consumed();
        }
        self.commit(cell.date)
    }

    pub fn select_today(&mut self) -> InteractionResult {
        let today = self.clock.today();
        if !self.bounds.contains(today) {
            return InteractionResult::consumed();
        }
        self.commit(today)
    }

    pub fn clear(&mut self) -> InteractionResult {
        tracing::debug!(picker = %self.base.id(), "date cleared");
        self.close();
        InteractionResult::commit(self.base.id(), Value::Text(String::new()))
    }

    fn commit(&mut self, date: NaiveDate) -> InteractionResult {
        let value = format_ymd(date);
        tracing::debug!(picker = %self.base.id(), value = %value, "date committed");
        self.close();
        InteractionResult::commit(self.base.id(), Value::Text(value))
    }

    fn initial_cursor(&self) -> NaiveDate {
        if let Some(selected) = self.selected.filter(|d| self.view.contains(*d)) {
            return selected;
        }
        let today = self.clock.today();
        if self.view.contains(today) {
            return today;
        }
        self.view.first_day()
    }

    fn move_cursor(&mut self, days: i64) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let Some(next) = panel.cursor.checked_add_signed(Duration::days(days)) else {
            return;
        };
        panel.cursor = next;
        if !self.view.contains(next) {
            self.view = MonthView::of(next);
        }
    }

    fn select_cursor(&mut self) -> InteractionResult {
        let Some(cursor) = self.cursor() else {
            return InteractionResult::ignored();
        };
        match cell_index(&self.cells(), cursor) {
            Some(index) => self.select_cell(index),
            None => InteractionResult::consumed(),
        }
    }

    fn hover_cell(&mut self, index: usize) -> InteractionResult {
        let cells = self.cells();
        let Some(cell) = cells.get(index).filter(|cell| cell.belongs_to_viewed_month) else {
            return InteractionResult::consumed();
        };
        match self.panel.as_mut() {
            Some(panel) if panel.cursor != cell.date => {
                panel.cursor = cell.date;
                InteractionResult::handled()
            }
            _ => InteractionResult::consumed(),
        }
    }

    fn trigger_text(&self) -> (String, Style) {
        match self.selected {
            Some(date) => (calendar::display_date(date), Style::default()),
            None => (
                self.placeholder.clone(),
                Style::new().color(Color::DarkGrey),
            ),
        }
    }
}

// ── Drawable ──────────────────────────────────────────────────────────────────

impl Drawable for CalendarPicker {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx);
        let (text, mut value_style) = self.trigger_text();
        if focused && self.selected.is_some() {
            value_style = value_style.color(Color::Cyan);
        }
        if self.disabled {
            value_style = value_style.dim();
        }

        let chevron = if self.is_open() { " ▴" } else { " ▾" };
        let mut lines = vec![vec![
            Span::new(self.base.prefixed_label(focused)).no_wrap(),
            Span::styled(text, value_style).no_wrap(),
            Span::styled(chevron, Style::new().color(Color::DarkGrey)).no_wrap(),
        ]];

        if let Some(panel) = &self.panel {
            let cells = self.cells();
            lines.extend(panel_lines(&PanelView {
                view: self.view,
                cells: &cells,
                selected: self.selected,
                cursor: Some(panel.cursor),
                today: self.clock.today(),
                bounds: self.bounds,
            }));
        }

        DrawOutput { lines }
    }
}

// ── Interactive ───────────────────────────────────────────────────────────────

impl Interactive for CalendarPicker {
    fn focus_mode(&self) -> FocusMode {
        if self.disabled {
            FocusMode::None
        } else {
            FocusMode::Leaf
        }
    }

    fn wants_autofocus(&self) -> bool {
        self.autofocus && !self.disabled
    }

    fn value_target(&self) -> Option<&str> {
        Some(self.base.id())
    }

    fn attach_listeners(&mut self, listeners: &PointerListeners) {
        self.close();
        self.listeners = listeners.clone();
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if self.disabled {
            return InteractionResult::ignored();
        }

        if !self.is_open() {
            let opens = matches!(key.code, KeyCode::Enter | KeyCode::Down)
                || key.printable() == Some(' ');
            if !opens {
                return InteractionResult::ignored();
            }
            self.open();
            return InteractionResult::handled();
        }

        // Esc is deliberately left unbound while open.
        match key.code {
            KeyCode::Left => {
                self.move_cursor(-1);
                InteractionResult::handled()
            }
            KeyCode::Right => {
                self.move_cursor(1);
                InteractionResult::handled()
            }
            KeyCode::Up => {
                self.move_cursor(-7);
                InteractionResult::handled()
            }
            KeyCode::Down => {
                self.move_cursor(7);
                InteractionResult::handled()
            }
            KeyCode::PageUp => {
                self.navigate_month(-1);
                InteractionResult::handled()
            }
            KeyCode::PageDown => {
                self.navigate_month(1);
                InteractionResult::handled()
            }
            KeyCode::Enter => self.select_cursor(),
            KeyCode::Backspace | KeyCode::Delete if self.selected.is_some() => self.clear(),
            // Character shortcuts only without Ctrl/Alt.
            _ => match key.printable() {
                Some('<') => {
                    self.navigate_month(-1);
                    InteractionResult::handled()
                }
                Some('>') => {
                    self.navigate_month(1);
                    InteractionResult::handled()
                }
                Some(' ') => self.select_cursor(),
                Some('t' | 'T') => self.select_today(),
                _ => InteractionResult::ignored(),
            },
        }
    }

    fn on_pointer(&mut self, event: PointerEvent) -> InteractionResult {
        if self.disabled {
            return InteractionResult::ignored();
        }
        let Some(hit) = hit_test(
            event.row,
            event.col,
            self.is_open(),
            self.selected.is_some(),
        ) else {
            return InteractionResult::ignored();
        };

        if !event.is_press() {
            return match hit {
                Hit::Cell(index) => self.hover_cell(index),
                _ => InteractionResult::ignored(),
            };
        }

        match hit {
            Hit::Trigger => {
                self.toggle();
                InteractionResult::handled()
            }
            Hit::PrevMonth => {
                self.navigate_month(-1);
                InteractionResult::handled()
            }
            Hit::NextMonth => {
                self.navigate_month(1);
                InteractionResult::handled()
            }
            Hit::Cell(index) => self.select_cell(index),
            Hit::Today => self.select_today(),
            Hit::Clear => self.clear(),
            Hit::Panel => InteractionResult::consumed(),
        }
    }

    fn on_outside_pointer(&mut self) -> InteractionResult {
        if !self.is_open() {
            return InteractionResult::ignored();
        }
        self.close();
        InteractionResult::handled()
    }

    fn on_blur(&mut self) -> InteractionResult {
        self.on_outside_pointer()
    }

    fn value(&self) -> Option<Value> {
        self.selected.map(|date| Value::Text(format_ymd(date)))
    }

    /// Pushes the caller-owned value in. A changed value closes the panel and
    /// moves the view to the new date.
    fn set_value(&mut self, value: Value) {
        let text = value.to_text_scalar();
        if text == self.raw_value {
            return;
        }
        self.selected = parse_ymd(&text);
        self.raw_value = text;
        if let Some(date) = self.selected {
            self.view = MonthView::of(date);
        }
        self.close();
    }

    fn validate(&self) -> Result<(), String> {
        let text = self.selected.map(format_ymd).unwrap_or_default();
        run_validators(&self.validators, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::CalendarPicker;
    use crate::core::value::Value;
    use crate::runtime::listeners::PointerListeners;
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, PointerEvent};
    use crate::ui::span::line_text;
    use crate::widgets::shared::calendar::{FixedClock, MonthView};
    use crate::widgets::traits::{Drawable, Interactive, RenderContext};
    use chrono::{Datelike, NaiveDate};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn picker() -> CalendarPicker {
        CalendarPicker::new("date", "Date").with_clock(Arc::new(FixedClock(date(2024, 3, 12))))
    }

    fn committed(result: &crate::widgets::traits::InteractionResult) -> Option<String> {
        result
            .change()
            .and_then(|change| change.value.as_text().map(str::to_string))
    }

    #[test]
    fn view_starts_at_value_or_today() {
        assert_eq!(picker().view(), MonthView::new(2024, 2));
        let p = picker().with_value("2021-07-04");
        assert_eq!(p.view(), MonthView::new(2021, 6));
        assert_eq!(p.selected_date(), Some(date(2021, 7, 4)));
    }

    #[test]
    fn malformed_value_is_no_selection() {
        let p = picker().with_value("not-a-date");
        assert_eq!(p.selected_date(), None);
        assert_eq!(p.value(), None);
        assert_eq!(p.view(), MonthView::new(2024, 2));
    }

    #[test]
    fn twelve_forward_navigations_cycle() {
        let mut p = picker();
        let start = p.view();
        for _ in 0..12 {
            p.navigate_month(1);
        }
        assert_eq!(p.view().month0, start.month0);
        assert_eq!(p.view().year, start.year + 1);
        for _ in 0..12 {
            p.navigate_month(-1);
        }
        assert_eq!(p.view(), start);
    }

    #[test]
    fn navigation_keeps_value() {
        let mut p = picker().with_value("2024-03-15");
        p.open();
        p.navigate_month(1);
        assert_eq!(p.view(), MonthView::new(2024, 3));
        assert_eq!(p.selected_date(), Some(date(2024, 3, 15)));
        assert_eq!(p.cursor(), Some(date(2024, 4, 15)));
        assert!(p.is_open());
    }

    #[test]
    fn cursor_day_clamps_to_shorter_month() {
        let mut p = picker().with_value("2024-01-31");
        p.open();
        p.navigate_month(1);
        assert_eq!(p.cursor(), Some(date(2024, 2, 29)));
    }

    #[test]
    fn selecting_commits_but_does_not_own_the_value() {
        let mut p = picker();
        p.open();
        let index = p.index_of_day(15).expect("day 15");
        let result = p.select_cell(index);
        assert_eq!(committed(&result).as_deref(), Some("2024-03-15"));
        assert!(!p.is_open());
        // Controlled: nothing changes until the owner pushes the value back.
        assert_eq!(p.selected_date(), None);
        p.set_value(Value::text("2024-03-15"));
        assert_eq!(p.selected_date(), Some(date(2024, 3, 15)));
    }

    #[test]
    fn adjacent_month_cells_are_inert() {
        let mut p = picker();
        p.open();
        let result = p.select_cell(0);
        assert!(result.change().is_none());
        assert!(p.is_open());
        assert!(p.select_cell(99).change().is_none());
    }

    #[test]
    fn today_respects_bounds() {
        let mut p = picker().with_max("2024-03-01");
        p.open();
        assert!(p.select_today().change().is_none());
        assert!(p.is_open());

        let mut p = picker();
        p.open();
        assert_eq!(committed(&p.select_today()).as_deref(), Some("2024-03-12"));
        assert!(!p.is_open());
    }

    #[test]
    fn clear_commits_empty_and_closes() {
        let mut p = picker().with_value("2024-03-15");
        p.open();
        let result = p.clear();
        assert_eq!(committed(&result).as_deref(), Some(""));
        assert!(!p.is_open());
    }

    #[test]
    fn external_value_change_closes_and_rederives_view() {
        let mut p = picker().with_value("2024-03-15");
        p.open();
        p.navigate_month(5);
        p.set_value(Value::text("2023-11-02"));
        assert!(!p.is_open());
        assert_eq!(p.view(), MonthView::new(2023, 10));

        // Clearing keeps the last viewed month.
        p.set_value(Value::text(""));
        assert_eq!(p.selected_date(), None);
        assert_eq!(p.view(), MonthView::new(2023, 10));
    }

    #[test]
    fn listener_registered_only_while_open() {
        let listeners = PointerListeners::new();
        let mut p = picker().with_listeners(listeners.clone());
        assert!(!listeners.is_registered("date"));
        p.open();
        assert!(listeners.is_registered("date"));
        p.on_outside_pointer();
        assert!(!p.is_open());
        assert!(!listeners.is_registered("date"));

        p.open();
        let index = p.index_of_day(20).expect("day 20");
        p.select_cell(index);
        assert!(!listeners.is_registered("date"));

        p.open();
        drop(p);
        assert!(listeners.is_empty());
    }

    #[test]
    fn keyboard_opens_moves_and_selects() {
        let mut p = picker();
        assert!(p.on_key(KeyEvent::key(KeyCode::Enter)).handled);
        assert_eq!(p.cursor(), Some(date(2024, 3, 12)));
        p.on_key(KeyEvent::key(KeyCode::Right));
        p.on_key(KeyEvent::key(KeyCode::Down));
        assert_eq!(p.cursor(), Some(date(2024, 3, 20)));
        let result = p.on_key(KeyEvent::key(KeyCode::Enter));
        assert_eq!(committed(&result).as_deref(), Some("2024-03-20"));
    }

    #[test]
    fn cursor_crossing_month_edge_moves_view() {
        let mut p = picker().with_value("2024-03-01");
        p.open();
        p.on_key(KeyEvent::key(KeyCode::Left));
        assert_eq!(p.cursor(), Some(date(2024, 2, 29)));
        assert_eq!(p.view(), MonthView::new(2024, 1));
    }

    #[test]
    fn navigation_saturates_at_extreme_deltas() {
        let mut p = picker().with_value("2024-03-15");
        p.open();
        p.navigate_month(i32::MAX);
        assert_eq!(p.view(), MonthView::of(NaiveDate::MAX));
        assert_eq!(p.view().first_day().year(), p.view().year);
        assert!(p.is_open());
        assert!(p.cursor().is_some_and(|cursor| p.view().contains(cursor)));

        p.navigate_month(i32::MIN);
        assert_eq!(p.view(), MonthView::of(NaiveDate::MIN));
        assert_eq!(p.selected_date(), Some(date(2024, 3, 15)));
        assert_eq!(p.cells().len(), 42);
    }

    #[test]
    fn modified_letters_are_not_shortcuts() {
        let mut p = picker();
        p.open();
        let ctrl_t = p.on_key(KeyEvent::ctrl(KeyCode::Char('t')));
        assert!(ctrl_t.change().is_none());
        assert!(!ctrl_t.handled);
        let alt_gt = p.on_key(KeyEvent::new(KeyCode::Char('>'), KeyModifiers::ALT));
        assert!(!alt_gt.handled);
        assert_eq!(p.view(), MonthView::new(2024, 2));
        assert!(p.is_open());

        p.on_key(KeyEvent::key(KeyCode::Char('>')));
        assert_eq!(p.view(), MonthView::new(2024, 3));
        let today = p.on_key(KeyEvent::key(KeyCode::Char('t')));
        assert_eq!(committed(&today).as_deref(), Some("2024-03-12"));
    }

    #[test]
    fn escape_is_not_bound() {
        let mut p = picker();
        p.open();
        let result = p.on_key(KeyEvent::key(KeyCode::Esc));
        assert!(!result.handled);
        assert!(p.is_open());
    }

    #[test]
    fn disabled_picker_never_opens() {
        let mut p = picker().with_disabled(true);
        p.on_key(KeyEvent::key(KeyCode::Enter));
        p.on_pointer(PointerEvent::press(0, 4));
        p.open();
        assert!(!p.is_open());
    }

    #[test]
    fn pointer_press_on_day_cell_commits() {
        let mut p = picker();
        p.on_pointer(PointerEvent::press(0, 0));
        assert!(p.is_open());
        // March 2024 starts on Friday: the 1st is column 5 of the first row.
        let result = p.on_pointer(PointerEvent::press(3, 2 + 5 * 4));
        assert_eq!(committed(&result).as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn pointer_header_arrows_navigate() {
        let mut p = picker();
        p.open();
        p.on_pointer(PointerEvent::press(1, 2));
        assert_eq!(p.view(), MonthView::new(2024, 1));
        p.on_pointer(PointerEvent::press(1, 27));
        p.on_pointer(PointerEvent::press(1, 27));
        assert_eq!(p.view(), MonthView::new(2024, 3));
    }

    #[test]
    fn draw_shows_placeholder_and_grid() {
        let mut p = picker().with_placeholder("All dates");
        let ctx = RenderContext::focused("date");
        let closed = p.draw(&ctx);
        assert_eq!(closed.lines.len(), 1);
        assert!(line_text(&closed.lines[0]).contains("All dates"));

        p.open();
        let open = p.draw(&ctx);
        assert_eq!(open.lines.len(), 10);
        assert!(line_text(&open.lines[1]).contains("March 2024"));
        assert_eq!(line_text(&open.lines[2]), "   Su  Mo  Tu  We  Th  Fr  Sa ");
        assert!(line_text(&open.lines[3]).starts_with("   25  26  27  28  29   1"));
        assert_eq!(line_text(&open.lines[9]), "  [Today]");
    }

    #[test]
    fn trigger_shows_display_date() {
        let p = picker().with_value("2024-03-15");
        let out = p.draw(&RenderContext::default());
        assert!(line_text(&out.lines[0]).contains("Mar 15, 2024"));
    }
}
