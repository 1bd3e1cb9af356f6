use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, DialogField, DialogState};
use crate::util::text::truncate_to_width;

use super::centered_rect;

const LABEL_WIDTH: usize = 13;

/// Render the new/edit item dialog as a centered modal
pub fn render_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dialog) = &app.dialog else {
        return;
    };

    let width = 62.min(area.width.saturating_sub(4)).max(30);
    // One row per field plus the description's extra room and the chrome
    let height = 13.min(area.height.saturating_sub(2));
    let rect = centered_rect(area, width, height);

    let title = if dialog.editing.is_some() {
        " Edit item "
    } else {
        " New item "
    };

    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(app.theme.background));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let value_width = (inner.width as usize).saturating_sub(LABEL_WIDTH + 2);
    let mut lines = Vec::with_capacity(DialogField::ORDER.len() + 1);
    lines.push(Line::default());
    for field in DialogField::ORDER {
        lines.push(field_line(app, dialog, field, value_width));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, inner);
}

fn field_line<'a>(
    app: &App,
    dialog: &DialogState,
    field: DialogField,
    value_width: usize,
) -> Line<'a> {
    let theme = &app.theme;
    let focused = dialog.field == field;
    let label_style = if focused {
        Style::default()
            .fg(theme.text_bright)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim).bg(theme.background)
    };

    let mut spans = vec![Span::styled(
        format!(" {:>width$}  ", field.label(), width = LABEL_WIDTH - 1),
        label_style,
    )];

    match field {
        DialogField::Priority => {
            spans.extend(enum_value_spans(
                app,
                dialog.priority.label(),
                theme.priority_color(dialog.priority),
                focused,
            ));
        }
        DialogField::Severity => {
            spans.extend(enum_value_spans(
                app,
                dialog.severity.label(),
                theme.purple,
                focused,
            ));
        }
        _ => {
            let value = match field {
                DialogField::Title => &dialog.title,
                DialogField::Description => &dialog.description,
                DialogField::Assignee => &dialog.assignee,
                DialogField::Tags => &dialog.tags,
                DialogField::Due => &dialog.due,
                DialogField::Priority | DialogField::Severity => unreachable!(),
            };
            let value_style = Style::default().fg(theme.text_bright).bg(theme.background);
            if focused {
                // Show the text cursor as a bar at the edit position
                let cursor = dialog.cursor.min(value.len());
                spans.push(Span::styled(value[..cursor].to_string(), value_style));
                spans.push(Span::styled(
                    "\u{258C}",
                    Style::default().fg(theme.highlight).bg(theme.background),
                ));
                spans.push(Span::styled(value[cursor..].to_string(), value_style));
            } else {
                spans.push(Span::styled(
                    truncate_to_width(value, value_width),
                    Style::default().fg(theme.text).bg(theme.background),
                ));
            }
        }
    }

    Line::from(spans)
}

/// `◂ High ▸` when focused, plain value otherwise
fn enum_value_spans<'a>(
    app: &App,
    label: &str,
    color: ratatui::style::Color,
    focused: bool,
) -> Vec<Span<'a>> {
    let theme = &app.theme;
    let value_style = Style::default()
        .fg(color)
        .bg(theme.background)
        .add_modifier(Modifier::BOLD);
    if focused {
        vec![
            Span::styled(
                "\u{25C2} ",
                Style::default().fg(theme.highlight).bg(theme.background),
            ),
            Span::styled(label.to_string(), value_style),
            Span::styled(
                " \u{25B8}",
                Style::default().fg(theme.highlight).bg(theme.background),
            ),
        ]
    } else {
        vec![Span::styled(label.to_string(), value_style)]
    }
}
