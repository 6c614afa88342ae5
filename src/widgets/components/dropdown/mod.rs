mod model;
mod render;

use crate::core::value::Value;
use crate::runtime::listeners::{OutsideListener, PointerListeners};
use crate::terminal::{KeyCode, KeyEvent, PointerEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
};
use crate::widgets::validators::{Validator, run_validators};
use model::{step_backward, step_forward, typeahead_match};
use render::option_lines;

pub use model::SelectOption;

struct OpenPanel {
    focus_index: Option<usize>,
    _listener: OutsideListener,
}

/// Controlled single-choice dropdown with roving focus and first-letter
/// typeahead. Commits are reported as `ValueChanged { target: name, value }`.
pub struct SelectDropdown {
    base: InputBase,
    name: String,
    options: Vec<SelectOption>,
    selected_value: Option<String>,
    placeholder: String,
    disabled: bool,
    autofocus: bool,
    panel: Option<OpenPanel>,
    listeners: PointerListeners,
    validators: Vec<Validator>,
}

impl SelectDropdown {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        let base = InputBase::new(id, label);
        let name = base.id().to_string();
        Self {
            base,
            name,
            options,
            selected_value: None,
            placeholder: "Select…".to_string(),
            disabled: false,
            autofocus: false,
            panel: None,
            listeners: PointerListeners::new(),
            validators: Vec::new(),
        }
    }

    pub fn from_strings(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self::new(
            id,
            label,
            options.into_iter().map(SelectOption::plain).collect(),
        )
    }

    /// Field name reported with every commit. Defaults to the id.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(Value::Text(value.into()));
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

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_some()
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.panel.as_ref().and_then(|panel| panel.focus_index)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let value = self.selected_value.as_deref()?;
        self.options.iter().position(|option| option.value == value)
    }

    pub fn selected_option(&self) -> Option<&SelectOption> {
        self.selected_index().and_then(|index| self.options.get(index))
    }

    // ── Operations ────────────────────────────────────────────────────────────

    /// Trigger activation: opens with no focused option.
    pub fn open(&mut self) {
        self.open_with_focus(None);
    }

    fn open_with_focus(&mut self, focus_index: Option<usize>) {
        if self.disabled || self.panel.is_some() {
            return;
        }
        self.panel = Some(OpenPanel {
            focus_index,
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

    fn set_focus(&mut self, index: usize) -> bool {
        match self.panel.as_mut() {
            Some(panel) if panel.focus_index != Some(index) => {
                panel.focus_index = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn focus_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let next = step_forward(self.focus_index(), self.options.len());
        self.set_focus(next);
    }

    pub fn focus_prev(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let prev = step_backward(self.focus_index(), self.options.len());
        self.set_focus(prev);
    }

    /// Moves focus to the first option whose label starts with `ch`.
    pub fn typeahead(&mut self, ch: char) -> bool {
        match typeahead_match(&self.options, ch) {
            Some(index) => self.set_focus(index),
            None => false,
        }
    }

    pub fn commit(&mut self, index: usize) -> InteractionResult {
        let Some(option) = self.options.get(index) else {
            return InteractionResult::ignored();
        };
        let value = option.value.clone();
        tracing::debug!(
            dropdown = %self.base.id(),
            name = %self.name,
            value = %value,
            "option committed"
        );
        self.close();
        InteractionResult::commit(&self.name, Value::Text(value))
    }

    fn commit_focused(&mut self) -> InteractionResult {
        match self.focus_index() {
            Some(index) => self.commit(index),
            None => InteractionResult::consumed(),
        }
    }

    fn on_key_closed(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Enter | KeyCode::Char(' ') => {
                if self.options.is_empty() {
                    return InteractionResult::ignored();
                }
                self.open_with_focus(Some(self.selected_index().unwrap_or(0)));
                InteractionResult::handled()
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_key_open(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Down => {
                self.focus_next();
                InteractionResult::handled()
            }
            KeyCode::Up => {
                self.focus_prev();
                InteractionResult::handled()
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.commit_focused(),
            KeyCode::Esc => {
                self.close();
                InteractionResult::handled()
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.close();
                InteractionResult::passthrough()
            }
            _ => match key.printable() {
                Some(ch) => {
                    if self.typeahead(ch) {
                        InteractionResult::handled()
                    } else {
                        InteractionResult::consumed()
                    }
                }
                None => InteractionResult::ignored(),
            },
        }
    }
}

impl Drawable for SelectDropdown {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx);
        let (text, mut style) = match self.selected_option() {
            Some(option) => (option.label.clone(), Style::default()),
            None => (
                self.placeholder.clone(),
                Style::new().color(Color::DarkGrey),
            ),
        };
        if focused && self.selected_option().is_some() {
            style = style.color(Color::Cyan);
        }
        if self.disabled {
            style = style.dim();
        }
        let chevron = if self.is_open() { " ▴" } else { " ▾" };

        let mut lines = vec![vec![
            Span::new(self.base.prefixed_label(focused)).no_wrap(),
            Span::styled(text, style).no_wrap(),
            Span::styled(chevron, Style::new().color(Color::DarkGrey)).no_wrap(),
        ]];

        if let Some(panel) = &self.panel {
            lines.extend(option_lines(
                &self.options,
                self.selected_value.as_deref(),
                panel.focus_index,
            ));
        }

        DrawOutput { lines }
    }
}

impl Interactive for SelectDropdown {
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
        Some(&self.name)
    }

    fn attach_listeners(&mut self, listeners: &PointerListeners) {
        self.close();
        self.listeners = listeners.clone();
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if self.disabled {
            return InteractionResult::ignored();
        }
        if self.is_open() {
            self.on_key_open(key)
        } else {
            self.on_key_closed(key)
        }
    }

    fn on_pointer(&mut self, event: PointerEvent) -> InteractionResult {
        if self.disabled {
            return InteractionResult::ignored();
        }
        if event.row == 0 {
            if !event.is_press() {
                return InteractionResult::ignored();
            }
            self.toggle();
            return InteractionResult::handled();
        }
        if !self.is_open() {
            return InteractionResult::ignored();
        }

        let index = (event.row - 1) as usize;
        if index >= self.options.len() {
            return InteractionResult::consumed();
        }
        if event.is_press() {
            self.commit(index)
        } else if self.set_focus(index) {
            InteractionResult::handled()
        } else {
            InteractionResult::consumed()
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
        self.selected_value.clone().map(Value::Text)
    }

    fn set_value(&mut self, value: Value) {
        let next = value.as_text().filter(|text| !text.is_empty()).map(str::to_string);
        if next == self.selected_value {
            return;
        }
        self.selected_value = next;
        self.close();
    }

    fn validate(&self) -> Result<(), String> {
        run_validators(
            &self.validators,
            self.selected_value.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{SelectDropdown, SelectOption};
    use crate::core::value::Value;
    use crate::runtime::listeners::PointerListeners;
    use crate::terminal::{KeyCode, KeyEvent, PointerEvent};
    use crate::ui::span::line_text;
    use crate::widgets::traits::{Drawable, Interactive, RenderContext};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::key(code)
    }

    fn departments() -> SelectDropdown {
        SelectDropdown::new(
            "dept",
            "Department",
            vec![
                SelectOption::plain("Engineering"),
                SelectOption::plain("HR"),
            ],
        )
        .with_name("department")
    }

    fn fruit() -> SelectDropdown {
        SelectDropdown::from_strings(
            "fruit",
            "Fruit",
            vec!["Apple".into(), "Banana".into(), "Cherry".into()],
        )
    }

    #[test]
    fn arrow_down_opens_then_enter_commits() {
        let mut d = departments();
        assert!(d.on_key(key(KeyCode::Down)).handled);
        assert!(d.is_open());
        assert_eq!(d.focus_index(), Some(0));

        let result = d.on_key(key(KeyCode::Enter));
        let change = result.change().expect("commit");
        assert_eq!(change.target.as_str(), "department");
        assert_eq!(change.value, Value::text("Engineering"));
        assert!(!d.is_open());
    }

    #[test]
    fn keyboard_open_focuses_selected_option() {
        let mut d = departments().with_value("HR");
        d.on_key(key(KeyCode::Char(' ')));
        assert_eq!(d.focus_index(), Some(1));
    }

    #[test]
    fn focus_wraps() {
        let mut d = fruit();
        d.on_key(key(KeyCode::Up));
        assert_eq!(d.focus_index(), Some(0));
        d.on_key(key(KeyCode::Up));
        assert_eq!(d.focus_index(), Some(2));
        d.on_key(key(KeyCode::Down));
        assert_eq!(d.focus_index(), Some(0));
    }

    #[test]
    fn typeahead_after_pointer_open() {
        let mut d = fruit();
        d.on_pointer(PointerEvent::press(0, 3));
        assert!(d.is_open());
        assert_eq!(d.focus_index(), None);

        d.on_key(key(KeyCode::Char('c')));
        assert_eq!(d.focus_index(), Some(2));
        d.on_key(key(KeyCode::Char('q')));
        assert_eq!(d.focus_index(), Some(2));
    }

    #[test]
    fn enter_without_focus_does_nothing() {
        let mut d = fruit();
        d.open();
        let result = d.on_key(key(KeyCode::Enter));
        assert!(result.change().is_none());
        assert!(d.is_open());
    }

    #[test]
    fn escape_and_tab_close() {
        let mut d = fruit();
        d.on_key(key(KeyCode::Down));
        assert!(d.on_key(key(KeyCode::Esc)).handled);
        assert!(!d.is_open());

        d.on_key(key(KeyCode::Down));
        let result = d.on_key(key(KeyCode::Tab));
        assert!(!result.handled);
        assert!(!d.is_open());
        assert_eq!(d.focus_index(), None);
    }

    #[test]
    fn hover_focuses_and_click_commits() {
        let mut d = fruit();
        d.open();
        d.on_pointer(PointerEvent::hover(2, 6));
        assert_eq!(d.focus_index(), Some(1));
        assert!(d.is_open());

        let result = d.on_pointer(PointerEvent::press(3, 6));
        assert_eq!(result.change().map(|c| c.value.clone()), Some(Value::text("Cherry")));
        assert!(!d.is_open());
    }

    #[test]
    fn empty_options_ignore_keyboard_activation() {
        let mut d = SelectDropdown::new("none", "None", Vec::new());
        assert!(!d.on_key(key(KeyCode::Down)).handled);
        assert!(!d.is_open());

        d.on_pointer(PointerEvent::press(0, 0));
        assert!(d.is_open());
        let out = d.draw(&RenderContext::default());
        assert!(line_text(&out.lines[1]).contains("No options"));
        d.on_key(key(KeyCode::Down));
        assert_eq!(d.focus_index(), None);
    }

    #[test]
    fn disabled_ignores_input() {
        let mut d = fruit().with_disabled(true);
        d.on_key(key(KeyCode::Down));
        d.on_pointer(PointerEvent::press(0, 0));
        assert!(!d.is_open());
    }

    #[test]
    fn listener_lifetime_follows_panel() {
        let listeners = PointerListeners::new();
        let mut d = fruit().with_listeners(listeners.clone());
        d.on_key(key(KeyCode::Down));
        assert!(listeners.is_registered("fruit"));
        d.on_key(key(KeyCode::Esc));
        assert!(listeners.is_empty());

        d.on_key(key(KeyCode::Down));
        d.on_key(key(KeyCode::Enter));
        assert!(listeners.is_empty());

        d.on_key(key(KeyCode::Down));
        d.on_outside_pointer();
        assert!(listeners.is_empty());
    }

    #[test]
    fn controlled_value_drives_rendering() {
        let mut d = departments();
        d.on_key(key(KeyCode::Down));
        d.on_key(key(KeyCode::Enter));
        assert_eq!(d.selected_option(), None);

        d.set_value(Value::text("HR"));
        let out = d.draw(&RenderContext::focused("dept"));
        assert_eq!(line_text(&out.lines[0]), "> Department: HR ▾");

        d.open();
        let out = d.draw(&RenderContext::default());
        assert!(line_text(&out.lines[2]).ends_with("HR ✓"));
    }

    #[test]
    fn unknown_value_renders_placeholder() {
        let d = departments()
            .with_placeholder("Select department")
            .with_value("Sales");
        assert_eq!(d.selected_option(), None);
        let out = d.draw(&RenderContext::default());
        assert!(line_text(&out.lines[0]).contains("Select department"));
    }
}
