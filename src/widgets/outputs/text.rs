use crate::core::value::Value;
use crate::ui::span::Span;
use crate::ui::style::Style;
use crate::widgets::traits::{DrawOutput, Drawable, OutputNode, RenderContext};

/// Read-only block of lines (form messages, record listings).
pub struct Text {
    id: String,
    lines: Vec<String>,
    style: Style,
}

impl Text {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let mut out = Self {
            id: id.into(),
            lines: Vec::new(),
            style: Style::default(),
        };
        out.set_text(text);
        out
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.lines = if text.is_empty() {
            Vec::new()
        } else {
            text.lines().map(str::to_string).collect()
        };
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Drawable for Text {
    fn id(&self) -> &str {
        &self.id
    }

    fn draw(&self, _ctx: &RenderContext) -> DrawOutput {
        DrawOutput {
            lines: self
                .lines
                .iter()
                .map(|line| vec![Span::styled(line.clone(), self.style).no_wrap()])
                .collect(),
        }
    }
}

impl OutputNode for Text {
    fn set_value(&mut self, value: Value) {
        self.set_text(value.to_text_scalar());
    }
}
