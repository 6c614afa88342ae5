use crate::terminal::TerminalSize;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::node::Node;
use crate::widgets::traits::RenderContext;

#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    pub lines: Vec<SpanLine>,
    /// Rows occupied by each node, in frame coordinates.
    pub regions: Vec<NodeRegion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRegion {
    pub id: String,
    pub top: u16,
    pub height: u16,
}

impl NodeRegion {
    pub fn contains_row(&self, row: u16) -> bool {
        row >= self.top && row < self.top.saturating_add(self.height)
    }
}

/// Node drawn at frame row `row`, with the row relative to that node.
pub fn hit(regions: &[NodeRegion], row: u16) -> Option<(&str, u16)> {
    regions
        .iter()
        .find(|region| region.contains_row(row))
        .map(|region| (region.id.as_str(), row - region.top))
}

pub struct Renderer;

impl Renderer {
    pub fn render(
        title: &str,
        nodes: &[Node],
        ctx: &RenderContext,
        terminal_size: TerminalSize,
    ) -> RenderFrame {
        let mut frame = RenderFrame::default();
        let mut row_offset: u16 = 0;

        if !title.is_empty() {
            frame.lines.push(vec![Span::styled(
                title.to_string(),
                Style::new().color(Color::Cyan).bold(),
            )]);
            frame.lines.push(Vec::new());
            row_offset = 2;
        }

        for node in nodes {
            let out = node.draw(ctx);
            let height = out.lines.len() as u16;
            frame.regions.push(NodeRegion {
                id: node.id().to_string(),
                top: row_offset,
                height,
            });
            row_offset = row_offset.saturating_add(height);
            frame.lines.extend(out.lines);

            if let Some(error) = ctx.visible_errors.get(node.id()) {
                let error_style = Style::new().color(Color::Red);
                frame
                    .lines
                    .push(vec![Span::styled(format!("  ! {}", error), error_style)]);
                row_offset = row_offset.saturating_add(1);
            }
        }

        if terminal_size.height > 0 {
            frame.lines.truncate(terminal_size.height as usize);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::{Renderer, hit};
    use crate::terminal::TerminalSize;
    use crate::ui::span::line_text;
    use crate::widgets::node::Node;
    use crate::widgets::outputs::text::Text;
    use crate::widgets::traits::RenderContext;

    #[test]
    fn regions_track_rows_and_errors() {
        let nodes = vec![
            Node::output(Text::new("a", "one\ntwo")),
            Node::output(Text::new("b", "three")),
        ];
        let mut ctx = RenderContext::default();
        ctx.visible_errors
            .insert("a".to_string(), "broken".to_string());

        let frame = Renderer::render("Title", &nodes, &ctx, TerminalSize::default());
        let text: Vec<String> = frame.lines.iter().map(|l| line_text(l)).collect();
        assert_eq!(text, vec!["Title", "", "one", "two", "  ! broken", "three"]);
        assert_eq!(hit(&frame.regions, 3), Some(("a", 1)));
        assert_eq!(hit(&frame.regions, 4), None);
        assert_eq!(hit(&frame.regions, 5), Some(("b", 0)));
        assert_eq!(hit(&frame.regions, 0), None);
    }
}
