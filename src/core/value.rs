/// Value carried between a controlled widget and the host that owns it.
///
/// Widgets only ever propose values through `ValueChanged` actions; the host
/// stores them and pushes them back with `set_value`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    None,
    Text(String),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            Self::None => None,
        }
    }

    /// Text form used by validators; `None` reads as the empty string.
    pub fn to_text_scalar(&self) -> String {
        self.as_text().unwrap_or_default().to_string()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map(Self::Text).unwrap_or(Self::None)
    }
}
