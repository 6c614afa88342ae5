use crate::core::value::Value;
use crate::runtime::listeners::PointerListeners;
use crate::terminal::{KeyEvent, PointerEvent};
use crate::widgets::traits::{
    DrawOutput, FocusMode, InteractionResult, InteractiveNode, OutputNode, RenderContext,
};

pub enum Node {
    Input(Box<dyn InteractiveNode>),
    Output(Box<dyn OutputNode>),
}

impl Node {
    pub fn input(widget: impl InteractiveNode + 'static) -> Self {
        Self::Input(Box::new(widget))
    }

    pub fn output(widget: impl OutputNode + 'static) -> Self {
        Self::Output(Box::new(widget))
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Input(w) => w.id(),
            Self::Output(w) => w.id(),
        }
    }

    pub fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        match self {
            Self::Input(w) => w.draw(ctx),
            Self::Output(w) => w.draw(ctx),
        }
    }

    pub fn focus_mode(&self) -> FocusMode {
        match self {
            Self::Input(w) => w.focus_mode(),
            Self::Output(_) => FocusMode::None,
        }
    }

    pub fn is_focusable(&self) -> bool {
        self.focus_mode() == FocusMode::Leaf
    }

    pub fn wants_autofocus(&self) -> bool {
        match self {
            Self::Input(w) => w.wants_autofocus(),
            Self::Output(_) => false,
        }
    }

    pub fn value_target(&self) -> Option<&str> {
        match self {
            Self::Input(w) => w.value_target(),
            Self::Output(_) => None,
        }
    }

    pub fn attach_listeners(&mut self, listeners: &PointerListeners) {
        if let Self::Input(w) = self {
            w.attach_listeners(listeners);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match self {
            Self::Input(w) => w.on_key(key),
            Self::Output(_) => InteractionResult::ignored(),
        }
    }

    pub fn on_pointer(&mut self, event: PointerEvent) -> InteractionResult {
        match self {
            Self::Input(w) => w.on_pointer(event),
            Self::Output(_) => InteractionResult::ignored(),
        }
    }

    pub fn on_outside_pointer(&mut self) -> InteractionResult {
        match self {
            Self::Input(w) => w.on_outside_pointer(),
            Self::Output(_) => InteractionResult::ignored(),
        }
    }

    pub fn on_blur(&mut self) -> InteractionResult {
        match self {
            Self::Input(w) => w.on_blur(),
            Self::Output(_) => InteractionResult::ignored(),
        }
    }

    pub fn value(&self) -> Option<Value> {
        match self {
            Self::Input(w) => w.value(),
            Self::Output(_) => None,
        }
    }

    pub fn set_value(&mut self, value: Value) {
        match self {
            Self::Input(w) => w.set_value(value),
            Self::Output(w) => w.set_value(value),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Input(w) => w.validate(),
            Self::Output(_) => Ok(()),
        }
    }
}

/// Index of the node with `id`.
pub fn find_index(nodes: &[Node], id: &str) -> Option<usize> {
    nodes.iter().position(|node| node.id() == id)
}
