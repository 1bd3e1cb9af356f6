use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::centered_rect;

const BINDINGS: &[(&str, &str)] = &[
    ("\u{2190}\u{2193}\u{2191}\u{2192} / hjkl", "move the cursor"),
    ("Enter", "edit card"),
    ("n", "new card"),
    ("Delete / x", "delete card"),
    ("Space / g", "grab card (drop with Enter)"),
    ("Ctrl+\u{2190}/\u{2192}", "move card one column"),
    ("/", "text filter"),
    ("a", "assignee filter"),
    ("p", "cycle priority filter"),
    ("c", "clear filters"),
    ("e", "export board to JSON"),
    ("i", "import a JSON file"),
    ("q", "quit"),
];

/// Render the help overlay listing every key binding
pub fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let height = (BINDINGS.len() as u16 + 4).min(area.height);
    let rect = centered_rect(area, 52.min(area.width), height);

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.dim))
        .title(Span::styled(
            " Keys ",
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(app.theme.background));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let mut lines = vec![Line::default()];
    for (key, action) in BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {key:>14}  "),
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(app.theme.background),
            ),
            Span::styled(
                *action,
                Style::default().fg(app.theme.text).bg(app.theme.background),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, inner);
}
