use crate::core::{NodeId, value::Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    pub target: NodeId,
    pub value: Value,
}

impl ValueChange {
    pub fn new(target: impl Into<NodeId>, value: Value) -> Self {
        Self {
            target: target.into(),
            value,
        }
    }
}

/// Actions emitted by widgets in `InteractionResult`.
/// These flow upward from widgets to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// The widget proposes a new value for the field it is bound to. The host
    /// owns the value and decides whether to push it back.
    ValueChanged { change: ValueChange },
}
