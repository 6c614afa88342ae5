//! Owner of a form's field values.
//!
//! Widgets never keep a committed value on their own: they emit a
//! [`WidgetAction::ValueChanged`] and the host writes it into its store, then
//! pushes it back into the bound widget with `set_value`. The same path is
//! used for values that originate outside the widgets (reset after submit,
//! seeding from config).

use crate::core::value::Value;
use crate::runtime::command::Command;
use crate::runtime::event::{ValueChange, WidgetAction};
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::listeners::PointerListeners;
use crate::terminal::{KeyEvent, PointerEvent, TerminalSize};
use crate::ui::renderer::{NodeRegion, RenderFrame, Renderer, hit};
use crate::widgets::node::{Node, find_index};
use crate::widgets::traits::{InteractionResult, RenderContext};
use indexmap::IndexMap;
use std::collections::HashMap;

/// What the screen owning the host needs to react to after one event.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostOutcome {
    pub render: bool,
    pub changes: Vec<ValueChange>,
    pub submit: bool,
    pub exit: bool,
}

impl HostOutcome {
    fn absorb(&mut self, result: &InteractionResult) {
        self.render |= result.request_render;
    }
}

pub struct FormHost {
    nodes: Vec<Node>,
    values: IndexMap<String, Value>,
    focus: Option<usize>,
    listeners: PointerListeners,
    key_bindings: KeyBindings,
    visible_errors: HashMap<String, String>,
    regions: Vec<NodeRegion>,
}

impl FormHost {
    pub fn new(nodes: Vec<Node>) -> Self {
        let mut host = Self {
            nodes,
            values: IndexMap::new(),
            focus: None,
            listeners: PointerListeners::new(),
            key_bindings: KeyBindings::new(),
            visible_errors: HashMap::new(),
            regions: Vec::new(),
        };
        host.mount();
        host
    }

    pub fn with_key_bindings(mut self, key_bindings: KeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    fn mount(&mut self) {
        for node in &mut self.nodes {
            node.attach_listeners(&self.listeners);
            if let Some(target) = node.value_target() {
                let value = node.value().unwrap_or_default();
                self.values.insert(target.to_string(), value);
            }
        }
        self.focus = self
            .nodes
            .iter()
            .position(|node| node.is_focusable() && node.wants_autofocus())
            .or_else(|| self.nodes.iter().position(Node::is_focusable));
        tracing::debug!(
            nodes = self.nodes.len(),
            focus = ?self.focused_id(),
            "form mounted"
        );
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        find_index(&self.nodes, id).map(|index| &self.nodes[index])
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Text form of a stored value; `""` when unset.
    pub fn text(&self, key: &str) -> String {
        self.values
            .get(key)
            .map(Value::to_text_scalar)
            .unwrap_or_default()
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focus.map(|index| self.nodes[index].id())
    }

    pub fn listeners(&self) -> &PointerListeners {
        &self.listeners
    }

    pub fn visible_error(&self, id: &str) -> Option<&str> {
        self.visible_errors.get(id).map(String::as_str)
    }

    // ── Values ───────────────────────────────────────────────────────────────

    /// Writes `value` into the store and pushes it into every widget bound to
    /// `key`.
    pub fn set_value(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value.clone());
        for node in &mut self.nodes {
            if node.value_target() == Some(key) {
                node.set_value(value.clone());
                let id = node.id().to_string();
                self.visible_errors.remove(&id);
            }
        }
    }

    /// Replaces the value of a display node.
    pub fn set_output(&mut self, id: &str, value: Value) {
        if let Some(index) = find_index(&self.nodes, id) {
            self.nodes[index].set_value(value);
        }
    }

    /// Runs submit validation over every input. Failing nodes get an inline
    /// error until their value changes.
    pub fn validate(&mut self) -> bool {
        self.visible_errors.clear();
        for node in &self.nodes {
            if let Err(error) = node.validate() {
                self.visible_errors.insert(node.id().to_string(), error);
            }
        }
        self.visible_errors.is_empty()
    }

    pub fn show_error(&mut self, id: &str, error: impl Into<String>) {
        self.visible_errors.insert(id.to_string(), error.into());
    }

    pub fn clear_errors(&mut self) {
        self.visible_errors.clear();
    }

    // ── Focus ────────────────────────────────────────────────────────────────

    pub fn focus(&mut self, id: &str) -> bool {
        let Some(index) = find_index(&self.nodes, id) else {
            return false;
        };
        if !self.nodes[index].is_focusable() {
            return false;
        }
        let mut outcome = HostOutcome::default();
        self.move_focus(Some(index), &mut outcome);
        true
    }

    fn move_focus(&mut self, next: Option<usize>, outcome: &mut HostOutcome) {
        if next == self.focus {
            return;
        }
        if let Some(current) = self.focus {
            let result = self.nodes[current].on_blur();
            self.apply(result, outcome);
        }
        self.focus = next;
        outcome.render = true;
    }

    fn cycle_focus(&mut self, forward: bool, outcome: &mut HostOutcome) {
        let focusable: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_focusable())
            .map(|(index, _)| index)
            .collect();
        if focusable.is_empty() {
            return;
        }
        let position = self
            .focus
            .and_then(|current| focusable.iter().position(|index| *index == current));
        let next = match (position, forward) {
            (None, _) => 0,
            (Some(pos), true) => (pos + 1) % focusable.len(),
            (Some(pos), false) => (pos + focusable.len() - 1) % focusable.len(),
        };
        self.move_focus(Some(focusable[next]), outcome);
    }

    // ── Events ───────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> HostOutcome {
        let mut outcome = HostOutcome::default();
        let command = self.key_bindings.resolve(key);
        if command == Some(Command::Exit) {
            outcome.exit = true;
            return outcome;
        }

        if let Some(index) = self.focus {
            let result = self.nodes[index].on_key(key);
            let handled = result.handled;
            self.apply(result, &mut outcome);
            if handled {
                return outcome;
            }
        }

        match command {
            Some(Command::Submit) => {
                outcome.submit = true;
                outcome.render = true;
            }
            Some(Command::NextFocus) => self.cycle_focus(true, &mut outcome),
            Some(Command::PrevFocus) => self.cycle_focus(false, &mut outcome),
            Some(Command::Exit) | None => {}
        }
        outcome
    }

    /// Routes a pointer event given in frame coordinates.
    ///
    /// A press first goes to every registered outside listener that the press
    /// missed, then to the node under the pointer (which also takes focus).
    /// Hover only reaches the node under the pointer.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> HostOutcome {
        let mut outcome = HostOutcome::default();
        let pointed = hit(&self.regions, event.row).map(|(id, row)| (id.to_string(), row));

        if event.is_press() {
            let hit_id = pointed.as_ref().map(|(id, _)| id.as_str());
            for id in self.listeners.active_ids() {
                if Some(id.as_str()) == hit_id {
                    continue;
                }
                if let Some(index) = find_index(&self.nodes, &id) {
                    tracing::trace!(listener = %id, "outside pointer press");
                    let result = self.nodes[index].on_outside_pointer();
                    self.apply(result, &mut outcome);
                }
            }
        }

        let Some((id, local_row)) = pointed else {
            return outcome;
        };
        let Some(index) = find_index(&self.nodes, &id) else {
            return outcome;
        };
        if event.is_press() && self.nodes[index].is_focusable() {
            self.move_focus(Some(index), &mut outcome);
        }
        let local = PointerEvent {
            row: local_row,
            ..event
        };
        let result = self.nodes[index].on_pointer(local);
        self.apply(result, &mut outcome);
        outcome
    }

    fn apply(&mut self, result: InteractionResult, outcome: &mut HostOutcome) {
        outcome.absorb(&result);
        for action in result.actions {
            match action {
                WidgetAction::ValueChanged { change } => {
                    tracing::debug!(
                        target_field = %change.target,
                        value = %change.value.to_text_scalar(),
                        "value committed"
                    );
                    self.set_value(change.target.as_str(), change.value.clone());
                    outcome.changes.push(change);
                    outcome.render = true;
                }
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    pub fn render(&mut self, title: &str, terminal_size: TerminalSize) -> RenderFrame {
        let ctx = RenderContext {
            focused_id: self.focused_id().map(ToOwned::to_owned),
            visible_errors: self.visible_errors.clone(),
        };
        let frame = Renderer::render(title, &self.nodes, &ctx, terminal_size);
        self.regions = frame.regions.clone();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::FormHost;
    use crate::core::value::Value;
    use crate::terminal::{KeyCode, KeyEvent, TerminalSize};
    use crate::widgets::components::{SelectDropdown, SelectOption};
    use crate::widgets::node::Node;
    use crate::widgets::outputs::text::Text;

    fn departments() -> SelectDropdown {
        SelectDropdown::new(
            "department",
            "Department",
            vec![SelectOption::plain("HR"), SelectOption::plain("Sales")],
        )
    }

    #[test]
    fn mount_seeds_store_and_focuses_first_input() {
        let host = FormHost::new(vec![
            Node::output(Text::new("intro", "hello")),
            Node::input(departments()),
        ]);
        assert_eq!(host.focused_id(), Some("department"));
        assert_eq!(host.value("department"), Some(&Value::None));
    }

    #[test]
    fn committed_value_is_stored_and_pushed_back() {
        let mut host = FormHost::new(vec![Node::input(departments())]);
        host.handle_key(KeyEvent::key(KeyCode::Enter));
        host.handle_key(KeyEvent::key(KeyCode::Down));
        let outcome = host.handle_key(KeyEvent::key(KeyCode::Enter));

        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(host.text("department"), "Sales");
        let node = host.node("department").expect("node");
        assert_eq!(node.value(), Some(Value::from("Sales")));
    }

    #[test]
    fn ctrl_c_exits_even_while_panel_open() {
        let mut host = FormHost::new(vec![Node::input(departments())]);
        host.handle_key(KeyEvent::key(KeyCode::Enter));
        let outcome = host.handle_key(KeyEvent::ctrl(KeyCode::Char('c')));
        assert!(outcome.exit);
    }

    #[test]
    fn failed_validation_shows_until_value_changes() {
        let mut host = FormHost::new(vec![Node::input(departments().with_validator(
            crate::widgets::validators::required("Pick one."),
        ))]);
        assert!(!host.validate());
        assert_eq!(host.visible_error("department"), Some("Pick one."));

        let frame = host.render("", TerminalSize::default());
        assert_eq!(frame.lines.len(), 2);

        host.set_value("department", Value::from("HR"));
        assert_eq!(host.visible_error("department"), None);
        assert!(host.validate());
    }
}
