use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, InputKind, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Input(kind) => {
            let prefix = match kind {
                InputKind::Query => "/",
                InputKind::Assignee => "@",
                InputKind::ImportPath => "import: ",
            };
            let spans = vec![
                Span::styled(
                    format!("{prefix}{}", app.input_buffer),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            with_right_hint(spans, "Enter apply  Esc cancel", app, width)
        }

        Mode::Move => {
            let spans = vec![Span::styled(
                " moving card",
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )];
            with_right_hint(spans, "\u{2190}/\u{2192} target  Enter drop  Esc cancel", app, width)
        }

        Mode::Dialog => {
            let editing = app
                .dialog
                .as_ref()
                .is_some_and(|dialog| dialog.editing.is_some());
            let hint = if editing {
                "Tab fields  Enter save  Ctrl+D delete  Esc cancel"
            } else {
                "Tab fields  Enter save  Esc cancel"
            };
            with_right_hint(Vec::new(), hint, app, width)
        }

        Mode::Navigate => {
            if let Some(ref message) = app.status_message {
                let style = if app.status_is_error {
                    Style::default()
                        .fg(app.theme.text_bright)
                        .bg(ratatui::style::Color::Rgb(0x8D, 0x0B, 0x0B))
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(app.theme.text).bg(bg)
                };
                Line::from(Span::styled(format!(" {message}"), style))
            } else if app.config.ui.show_key_hints {
                let hint = "n new  Enter edit  Space grab  / filter  e export  i import  ? help";
                Line::from(Span::styled(
                    format!(" {hint}"),
                    Style::default().fg(app.theme.dim).bg(bg),
                ))
            } else {
                Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg)))
            }
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Pad the given spans and append a dim right-aligned hint if it fits
fn with_right_hint<'a>(
    mut spans: Vec<Span<'a>>,
    hint: &'a str,
    app: &App,
    width: usize,
) -> Line<'a> {
    let bg = app.theme.background;
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    Line::from(spans)
}
