use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use downline::app::App;
use downline::hierarchy::stats::HierarchyStats;

use super::colors;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Agency ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let stats = &app.stats;
    let spacing = app.layout.spacing;

    let mut lines = vec![
        Line::from(vec![
            Span::raw("  Agents: "),
            Span::styled(
                stats.total.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({} active, {} inactive)", stats.active, stats.inactive()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        stat_line("  Roots    ", stats.roots, colors::ACCENT_MUTED),
        stat_line("  Levels   ", stats.max_depth + usize::from(stats.total > 0), colors::ACCENT_MUTED),
        level_line(stats),
        stat_line("  Visible  ", app.layout.len(), colors::AGENT_ACTIVE),
        stat_line("  Collapsed", app.collapse.len(), colors::DOWNLINE_BADGE),
        Line::from(vec![
            Span::raw("  Spacing  "),
            Span::styled(
                format!("{}x{} ({})", spacing.horizontal, spacing.vertical, app.config.density),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    if let Some(ref err) = app.error {
        lines.push(Line::from(Span::styled(
            format!("  ! {err}"),
            Style::default().fg(colors::ERROR),
        )));
    } else if let Some(line) = selection_line(app) {
        lines.push(line);
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn stat_line(label: &str, value: usize, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(value.to_string(), Style::default().fg(color)),
    ])
}

/// Agent count on each level, shallowest first.
fn level_line(stats: &HierarchyStats) -> Line<'static> {
    let counts: Vec<String> = stats
        .per_depth
        .iter()
        .map(|(depth, count)| format!("L{depth}: {count}"))
        .collect();
    Line::from(vec![
        Span::raw("             "),
        Span::styled(counts.join("  "), Style::default().fg(Color::DarkGray)),
    ])
}

/// Path, downline and position of the selected agent.
fn selection_line(app: &App) -> Option<Line<'static>> {
    let id = app.selected_id()?;
    let agent = app.agent(id)?;
    let node = app.layout.node(id)?;
    Some(Line::from(vec![
        Span::styled("  ▶ ", Style::default().fg(colors::HIGHLIGHT_FG)),
        Span::raw(agent.path.clone()),
        Span::styled(
            format!(
                "  downline {}  @ ({:.0}, {:.0})",
                node.downline_count, node.position.x, node.position.y
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}
