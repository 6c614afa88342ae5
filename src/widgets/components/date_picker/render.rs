use super::layout::{CLEAR_LABEL, FOOTER_GAP, TITLE_WIDTH, TODAY_LABEL};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::shared::calendar::{
    CalendarCell, DateBounds, GRID_COLUMNS, MonthView, WEEKDAY_NAMES,
};
use chrono::NaiveDate;

pub(super) struct PanelView<'a> {
    pub view: MonthView,
    pub cells: &'a [CalendarCell],
    pub selected: Option<NaiveDate>,
    pub cursor: Option<NaiveDate>,
    pub today: NaiveDate,
    pub bounds: DateBounds,
}

pub(super) fn panel_lines(panel: &PanelView<'_>) -> Vec<SpanLine> {
    let mut lines = Vec::with_capacity(10);
    let dim = Style::new().color(Color::DarkGrey);

    lines.push(vec![
        Span::new("  ‹ ").no_wrap(),
        Span::styled(
            format!("{:^width$}", panel.view.title(), width = TITLE_WIDTH),
            Style::new().bold(),
        )
        .no_wrap(),
        Span::new(" ›").no_wrap(),
    ]);

    let mut header = vec![Span::new("  ").no_wrap()];
    header.extend(
        WEEKDAY_NAMES
            .iter()
            .map(|name| Span::styled(format!(" {} ", name), dim).no_wrap()),
    );
    lines.push(header);

    for row in panel.cells.chunks(GRID_COLUMNS) {
        let mut line: SpanLine = vec![Span::new("  ").no_wrap()];
        for cell in row {
            line.push(cell_span(panel, cell));
        }
        lines.push(line);
    }

    let today_style = if panel.bounds.contains(panel.today) {
        Style::new().color(Color::Cyan)
    } else {
        dim.dim()
    };
    let mut footer = vec![
        Span::new("  ").no_wrap(),
        Span::styled(TODAY_LABEL, today_style).no_wrap(),
    ];
    if panel.selected.is_some() {
        footer.push(Span::new(FOOTER_GAP).no_wrap());
        footer.push(Span::styled(CLEAR_LABEL, Style::new().color(Color::Red)).no_wrap());
    }
    lines.push(footer);

    lines
}

fn cell_span(panel: &PanelView<'_>, cell: &CalendarCell) -> Span {
    let is_cursor = panel.cursor == Some(cell.date) && cell.belongs_to_viewed_month;
    let is_selected = panel.selected == Some(cell.date);
    let is_today = cell.belongs_to_viewed_month && cell.date == panel.today;
    let disabled = !cell.belongs_to_viewed_month || !panel.bounds.contains(cell.date);

    let style = if is_cursor {
        Style::new().color(Color::Yellow).bold()
    } else if is_selected {
        Style::new().color(Color::Cyan).bold()
    } else if !cell.belongs_to_viewed_month {
        Style::new().color(Color::DarkGrey).dim()
    } else if disabled {
        Style::new().color(Color::DarkGrey)
    } else if is_today {
        Style::new().color(Color::Green)
    } else {
        Style::default()
    };

    let (l, r) = if is_cursor { ("[", "]") } else { (" ", " ") };
    Span::styled(format!("{}{:>2}{}", l, cell.day, r), style).no_wrap()
}
