use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the header: board name and active filters, with a separator
/// line below
pub fn render_header_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    render_title_row(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1]);
}

fn render_title_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let width = area.width as usize;

    let mut spans = vec![
        Span::styled(" ", bg_style),
        Span::styled("\u{25B6}", bg_style.fg(app.theme.purple)),
        Span::styled(" ", bg_style),
        Span::styled(
            app.config.board.name.clone(),
            bg_style.fg(app.theme.text_bright).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} items", app.items.len()),
            bg_style.fg(app.theme.dim),
        ),
    ];

    // Right-aligned active filter summary
    let summary = filter_summary(app);
    if !summary.is_empty() {
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let summary_width = summary.chars().count() + 1;
        if used + summary_width < width {
            spans.push(Span::styled(
                " ".repeat(width - used - summary_width),
                bg_style,
            ));
            spans.push(Span::styled(summary, bg_style.fg(app.theme.yellow)));
            spans.push(Span::styled(" ", bg_style));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect) {
    let line = "\u{2500}".repeat(area.width as usize);
    let paragraph = Paragraph::new(line)
        .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

/// Compact text form of the active filters, e.g. `/login  p:High  @sam`
fn filter_summary(app: &App) -> String {
    let mut parts = Vec::new();
    if !app.filters.query.is_empty() {
        parts.push(format!("/{}", app.filters.query));
    }
    if let Some(priority) = app.filters.priority {
        parts.push(format!("p:{}", priority.label()));
    }
    if let Some(assignee) = &app.filters.assignee {
        parts.push(format!("@{assignee}"));
    }
    parts.join("  ")
}
