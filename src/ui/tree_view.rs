use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use downline::app::{App, FocusPanel};
use downline::hierarchy::AgentStatus;

use super::colors;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.focus == FocusPanel::Tree {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Hierarchy ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.tree_rows.is_empty() {
        if let Some(ref err) = app.error {
            let msg = Paragraph::new(vec![
                Line::from(Span::styled(
                    " Snapshot rejected",
                    Style::default().fg(colors::ERROR).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(format!(" {err}"), Style::default().fg(colors::ERROR))),
            ])
            .wrap(Wrap { trim: false })
            .block(block);
            f.render_widget(msg, area);
            return;
        }
    }

    let items: Vec<ListItem> = app
        .tree_rows
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let icon = if row.has_downline() {
                if row.is_collapsed { "▸ " } else { "▾ " }
            } else {
                "  "
            };

            let mut spans = vec![
                Span::raw(indent),
                Span::styled(icon, Style::default().fg(Color::DarkGray)),
                Span::styled(&row.display_name, Style::default().fg(status_color(row.status))),
            ];

            if row.has_downline() {
                let badge = if row.is_collapsed {
                    format!("  +{}", row.downline_count)
                } else {
                    format!("  ({})", row.downline_count)
                };
                spans.push(Span::styled(badge, Style::default().fg(colors::DOWNLINE_BADGE)));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors::HIGHLIGHT_BG)
                .fg(colors::HIGHLIGHT_FG)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, area, &mut state);
}

pub fn status_color(status: AgentStatus) -> Color {
    match status {
        AgentStatus::Active => colors::AGENT_ACTIVE,
        AgentStatus::Inactive => colors::AGENT_INACTIVE,
    }
}
