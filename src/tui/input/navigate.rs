use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::item::Priority;
use crate::tui::app::{App, InputKind, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Help overlay intercepts everything until dismissed
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    // Any keypress clears a transient notice
    app.status_message = None;
    app.status_is_error = false;

    match (key.modifiers, key.code) {
        // Move the cursor card across columns, clamped at the edges
        (KeyModifiers::CONTROL, KeyCode::Left) => app.move_cursor_item(-1),
        (KeyModifiers::CONTROL, KeyCode::Right) => app.move_cursor_item(1),

        (_, KeyCode::Char('q')) => app.should_quit = true,
        (_, KeyCode::Char('?')) => app.show_help = true,

        // Cursor movement
        (_, KeyCode::Left) | (_, KeyCode::Char('h')) => {
            app.cursor_column = app.cursor_column.saturating_sub(1);
            app.clamp_cursor();
        }
        (_, KeyCode::Right) | (_, KeyCode::Char('l')) => {
            app.cursor_column = (app.cursor_column + 1).min(3);
            app.clamp_cursor();
        }
        (_, KeyCode::Up) | (_, KeyCode::Char('k')) => {
            app.cursor_row = app.cursor_row.saturating_sub(1);
        }
        (_, KeyCode::Down) | (_, KeyCode::Char('j')) => {
            app.cursor_row += 1;
            app.clamp_cursor();
        }

        // Card actions
        (_, KeyCode::Enter) => app.open_edit_dialog(),
        (_, KeyCode::Delete) | (_, KeyCode::Char('x')) => {
            if let Some(id) = app.cursor_item_id() {
                app.persist_delete(&id);
            }
        }
        (_, KeyCode::Char('n')) => app.open_new_dialog(),
        (_, KeyCode::Char(' ')) | (_, KeyCode::Char('g')) => app.grab_cursor_item(),

        // Filters
        (_, KeyCode::Char('/')) => {
            app.input_buffer = app.filters.query.clone();
            app.mode = Mode::Input(InputKind::Query);
        }
        (_, KeyCode::Char('a')) => {
            app.input_buffer = app.filters.assignee.clone().unwrap_or_default();
            app.mode = Mode::Input(InputKind::Assignee);
        }
        (_, KeyCode::Char('p')) => {
            app.filters.priority = cycle_priority(app.filters.priority);
            app.clamp_cursor();
        }
        (_, KeyCode::Char('c')) => {
            app.filters.clear();
            app.clamp_cursor();
        }

        // Transfer
        (_, KeyCode::Char('e')) => app.export_board(),
        (_, KeyCode::Char('i')) => {
            app.input_buffer = String::new();
            app.mode = Mode::Input(InputKind::ImportPath);
        }

        _ => {}
    }
}

/// None → Critical → High → Medium → Low → None
fn cycle_priority(current: Option<Priority>) -> Option<Priority> {
    match current {
        None => Some(Priority::Critical),
        Some(Priority::Critical) => Some(Priority::High),
        Some(Priority::High) => Some(Priority::Medium),
        Some(Priority::Medium) => Some(Priority::Low),
        Some(Priority::Low) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_filter_cycles_through_all_and_back_to_none() {
        let mut current = None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            current = cycle_priority(current);
            seen.push(current);
        }
        assert_eq!(
            seen,
            vec![
                Some(Priority::Critical),
                Some(Priority::High),
                Some(Priority::Medium),
                Some(Priority::Low),
                None,
            ]
        );
    }
}
