use super::model::SelectOption;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};

pub(super) const EMPTY_TEXT: &str = "No options";

pub(super) fn option_lines(
    options: &[SelectOption],
    selected_value: Option<&str>,
    focus_index: Option<usize>,
) -> Vec<SpanLine> {
    let inactive_style = Style::new().color(Color::DarkGrey);

    if options.is_empty() {
        return vec![vec![
            Span::styled(format!("    {}", EMPTY_TEXT), inactive_style.dim()).no_wrap(),
        ]];
    }

    options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let focused = focus_index == Some(index);
            let selected = selected_value == Some(option.value.as_str());

            let cursor = if focused {
                Span::styled("❯", Style::new().color(Color::Yellow)).no_wrap()
            } else {
                Span::new(" ").no_wrap()
            };
            let check = if selected {
                Span::styled("✓", Style::new().color(Color::Green)).no_wrap()
            } else {
                Span::new(" ").no_wrap()
            };
            let label_style = if focused {
                Style::new().color(Color::Cyan).bold()
            } else if selected {
                Style::new().color(Color::Green)
            } else {
                Style::default()
            };

            vec![
                Span::new("  ").no_wrap(),
                cursor,
                Span::new(" ").no_wrap(),
                Span::styled(option.label.clone(), label_style).no_wrap(),
                Span::new(" ").no_wrap(),
                check,
            ]
        })
        .collect()
}
