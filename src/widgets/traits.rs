use crate::core::value::Value;
use crate::runtime::event::{ValueChange, WidgetAction};
use crate::runtime::listeners::PointerListeners;
use crate::terminal::{KeyEvent, PointerEvent};
use crate::ui::span::SpanLine;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Node does not participate in focus cycling (outputs, disabled inputs).
    None,
    /// A single focusable leaf (picker, dropdown, …).
    Leaf,
}

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub focused_id: Option<String>,
    /// Nodes whose validation error should be shown inline.
    pub visible_errors: HashMap<String, String>,
}

impl RenderContext {
    pub fn focused(id: impl Into<String>) -> Self {
        Self {
            focused_id: Some(id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

// ---------------------------------------------------------------------------
// Drawable: every node can draw itself
// ---------------------------------------------------------------------------

pub trait Drawable: Send {
    fn id(&self) -> &str;
    fn label(&self) -> &str {
        ""
    }
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            handled: true,
            request_render: false,
            actions: Vec::new(),
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: Vec::new(),
        }
    }

    /// Not handled, but the widget changed state and wants a redraw
    /// (e.g. a dropdown that closed on `Tab` and lets the host move focus).
    pub fn passthrough() -> Self {
        Self {
            handled: false,
            request_render: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: vec![action],
        }
    }

    pub fn commit(target: &str, value: Value) -> Self {
        Self::with_action(WidgetAction::ValueChanged {
            change: ValueChange::new(target, value),
        })
    }

    /// First committed value change, if any.
    pub fn change(&self) -> Option<&ValueChange> {
        self.actions.iter().find_map(|action| match action {
            WidgetAction::ValueChanged { change } => Some(change),
        })
    }
}

// ---------------------------------------------------------------------------
// Interactive: input nodes
// ---------------------------------------------------------------------------

pub trait Interactive: Send {
    fn focus_mode(&self) -> FocusMode;

    /// Whether the host should focus this node when the form mounts.
    fn wants_autofocus(&self) -> bool {
        false
    }

    /// Key under which committed values are stored by the host.
    fn value_target(&self) -> Option<&str> {
        None
    }

    /// Hands the widget the host's outside-pointer registry. Widgets that
    /// open panels register themselves there only while open.
    fn attach_listeners(&mut self, _listeners: &PointerListeners) {}

    // --- input handling ---

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    /// Pointer event inside the widget, in widget-local coordinates.
    fn on_pointer(&mut self, _event: PointerEvent) -> InteractionResult {
        InteractionResult::ignored()
    }

    /// Pointer press that landed outside the widget while it was registered.
    fn on_outside_pointer(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }

    fn on_blur(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }

    // --- value ---

    fn value(&self) -> Option<Value> {
        None
    }
    fn set_value(&mut self, _value: Value) {}

    // --- validation ---

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// InteractiveNode: combined bound used in Node
// ---------------------------------------------------------------------------

pub trait InteractiveNode: Drawable + Interactive {}
impl<T> InteractiveNode for T where T: Drawable + Interactive {}

// ---------------------------------------------------------------------------
// OutputNode: output nodes
// ---------------------------------------------------------------------------

pub trait OutputNode: Drawable {
    fn set_value(&mut self, _value: Value) {}
}
