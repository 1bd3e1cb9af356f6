use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::item::{Status, TriageItem};
use crate::tui::app::App;
use crate::util::text::{truncate_description, wrap_words};

/// Render the four status columns
pub fn render_board_view(frame: &mut Frame, app: &mut App, area: Rect) {
    // Clone the visible buckets so the per-column scroll state can be
    // adjusted while rendering
    let buckets: Vec<Vec<TriageItem>> = app
        .buckets()
        .values()
        .map(|bucket| bucket.iter().map(|item| (*item).clone()).collect())
        .collect();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let drop_target = app.move_state.as_ref().map(|ms| ms.target_column);
    let grabbed_id = app.move_state.as_ref().map(|ms| ms.item_id.clone());

    for (idx, bucket) in buckets.iter().enumerate() {
        render_column(
            frame,
            app,
            columns[idx],
            idx,
            bucket,
            drop_target == Some(idx),
            grabbed_id.as_deref(),
        );
    }
}

fn render_column(
    frame: &mut Frame,
    app: &mut App,
    area: Rect,
    column: usize,
    bucket: &[TriageItem],
    is_drop_target: bool,
    grabbed_id: Option<&str>,
) {
    let status = &Status::COLUMNS[column];
    let accent = app.theme.column_color(status);

    let border_style = if is_drop_target {
        Style::default()
            .fg(app.theme.selection_border)
            .add_modifier(Modifier::BOLD)
    } else if column == app.cursor_column {
        Style::default().fg(accent)
    } else {
        Style::default().fg(app.theme.dim)
    };

    let title = format!(" {} ({}) ", status.label(), bucket.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if bucket.is_empty() {
        let hint = if app.filters.is_active() {
            " no matching items"
        } else {
            " no items"
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(app.theme.dim).bg(app.theme.background));
        frame.render_widget(empty, inner);
        return;
    }

    // Build every card's lines, remembering where the cursor card starts
    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_range = (0usize, 0usize);
    for (row, item) in bucket.iter().enumerate() {
        let selected = column == app.cursor_column && row == app.cursor_row;
        let grabbed = grabbed_id == Some(item.id.as_str());
        let start = lines.len();
        lines.extend(card_lines(app, item, width, selected, grabbed));
        if selected {
            cursor_range = (start, lines.len());
        }
        lines.push(Line::default());
    }

    // Keep the cursor card visible
    let visible = inner.height as usize;
    let is_cursor_column = column == app.cursor_column;
    let scroll = &mut app.column_scroll[column];
    if is_cursor_column {
        if cursor_range.0 < *scroll {
            *scroll = cursor_range.0;
        } else if cursor_range.1 > *scroll + visible {
            *scroll = cursor_range.1.saturating_sub(visible);
        }
    }
    *scroll = (*scroll).min(lines.len().saturating_sub(1));

    let end = lines.len().min(*scroll + visible);
    let visible_lines: Vec<Line> = lines[*scroll..end].to_vec();
    let paragraph =
        Paragraph::new(visible_lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, inner);
}

/// Build the display lines for one card
fn card_lines<'a>(
    app: &App,
    item: &TriageItem,
    width: usize,
    selected: bool,
    grabbed: bool,
) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let line_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(line_bg);
    let mut lines = Vec::new();

    // Title rows (wrapped, never shortened), with a grab marker while the
    // card is riding a move
    let marker = if grabbed { "\u{2261} " } else { "" };
    let title_style = base.fg(theme.text_bright).add_modifier(Modifier::BOLD);
    for wrapped in wrap_words(&format!("{marker}{}", item.title), width.max(1)) {
        lines.push(Line::from(Span::styled(wrapped, title_style)).style(base));
    }

    // Priority pill, severity, due date
    let mut meta: Vec<Span> = Vec::new();
    meta.push(Span::styled(
        format!("[{}]", item.priority.label()),
        base.fg(theme.priority_color(item.priority))
            .add_modifier(Modifier::BOLD),
    ));
    meta.push(Span::styled(
        format!(" {}", item.severity.label()),
        base.fg(theme.purple),
    ));
    if let Some(due) = item.due {
        let overdue = due < Local::now().date_naive();
        let style = if overdue {
            base.fg(theme.red).add_modifier(Modifier::BOLD)
        } else {
            base.fg(theme.dim)
        };
        meta.push(Span::styled(format!(" due {}", due.format("%b %-d")), style));
    }
    lines.push(Line::from(meta).style(base));

    // Assignee and tag chips
    let mut people: Vec<Span> = Vec::new();
    if let Some(assignee) = &item.assignee {
        people.push(Span::styled(format!("@{assignee}"), base.fg(theme.cyan)));
    }
    for tag in &item.tags {
        if !people.is_empty() {
            people.push(Span::styled(" ", base));
        }
        people.push(Span::styled(
            format!("#{tag}"),
            base.fg(theme.tag_color(tag)),
        ));
    }
    if !people.is_empty() {
        lines.push(Line::from(people).style(base));
    }

    // Shortened description, wrapped to the column
    if !item.description.is_empty() {
        for wrapped in wrap_words(&truncate_description(&item.description), width) {
            lines.push(Line::from(Span::styled(wrapped, base.fg(theme.text))).style(base));
        }
    }

    lines
}
