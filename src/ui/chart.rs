use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders};

use downline::app::{App, FocusPanel};
use downline::layout::TreeLayout;

use super::{colors, tree_view};

/// Longest label drawn on the chart before truncation.
const MAX_LABEL: usize = 12;

/// Draw visible agents at their layout positions with parent-child edges.
/// Layout y grows downward; the canvas y axis grows upward, so y is negated.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focus == FocusPanel::Chart {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Org Chart ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let layout = &app.layout;
    let Some((x_bounds, y_bounds)) = viewport(layout) else {
        f.render_widget(block, area);
        return;
    };

    let selected = app.selected_id();
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for edge in &layout.edges {
                let (Some(from), Some(to)) = (layout.position(&edge.source), layout.position(&edge.target)) else {
                    continue;
                };
                let color = if edge.animated { colors::EDGE_ACTIVE } else { colors::EDGE_IDLE };
                ctx.draw(&CanvasLine::new(from.x, -from.y, to.x, -to.y, color));
            }
            ctx.layer();

            for node in &layout.nodes {
                let name = app
                    .agent(&node.id)
                    .map(|a| a.display_name())
                    .unwrap_or(&node.id);
                let mut style = Style::default().fg(tree_view::status_color(node.status));
                if selected == Some(node.id.as_str()) {
                    style = style
                        .bg(colors::HIGHLIGHT_BG)
                        .fg(colors::HIGHLIGHT_FG)
                        .add_modifier(Modifier::BOLD);
                }
                let mut spans = vec![Span::styled(truncate(name, MAX_LABEL), style)];
                if node.is_collapsed && node.downline_count > 0 {
                    spans.push(Span::styled(
                        format!(" +{}", node.downline_count),
                        Style::default().fg(colors::DOWNLINE_BADGE),
                    ));
                }
                ctx.print(node.position.x, -node.position.y, Line::from(spans));
            }
        });

    f.render_widget(canvas, area);
}

/// Canvas bounds around the layout, padded by half a slot on every side.
fn viewport(layout: &TreeLayout) -> Option<([f64; 2], [f64; 2])> {
    let bounds = layout.bounds()?;
    let pad_x = layout.spacing.horizontal / 2.0;
    let pad_y = layout.spacing.vertical / 2.0;
    Some((
        [bounds.min_x - pad_x, bounds.max_x + pad_x],
        [-bounds.max_y - pad_y, -bounds.min_y + pad_y],
    ))
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let cut: String = name.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
