use serde::{Deserialize, Serialize};

/// One `{value, label}` entry. Values are expected, not required, to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its value.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
        }
    }
}

/// Index of the first option whose label starts with `ch`, ignoring case.
pub(super) fn typeahead_match(options: &[SelectOption], ch: char) -> Option<usize> {
    let needle: String = ch.to_lowercase().collect();
    options
        .iter()
        .position(|option| option.label.to_lowercase().starts_with(&needle))
}

pub(super) fn step_forward(focus: Option<usize>, len: usize) -> usize {
    match focus {
        Some(index) => (index + 1) % len,
        None => 0,
    }
}

pub(super) fn step_backward(focus: Option<usize>, len: usize) -> usize {
    match focus {
        Some(index) => (index % len + len - 1) % len,
        None => len - 1,
    }
}
