use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, InputKind, Mode};
use crate::util::text::prev_grapheme_boundary;

/// One-line prompt at the status row: filter query, assignee filter, or
/// an import file path. `Enter` applies, `Esc` discards.
pub(super) fn handle_prompt(app: &mut App, kind: InputKind, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_buffer.clear();
            app.mode = Mode::Navigate;
        }

        KeyCode::Enter => {
            let raw = std::mem::take(&mut app.input_buffer);
            app.mode = Mode::Navigate;
            apply(app, kind, raw.trim());
        }

        KeyCode::Backspace => {
            if let Some(boundary) = prev_grapheme_boundary(&app.input_buffer, app.input_buffer.len())
            {
                app.input_buffer.truncate(boundary);
            }
        }

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_buffer.push(c);
        }

        _ => {}
    }
}

fn apply(app: &mut App, kind: InputKind, value: &str) {
    match kind {
        InputKind::Query => {
            app.filters.query = value.to_string();
            app.clamp_cursor();
        }
        InputKind::Assignee => {
            app.filters.assignee = (!value.is_empty()).then(|| value.to_string());
            app.clamp_cursor();
        }
        InputKind::ImportPath => {
            if !value.is_empty() {
                app.import_board(value);
            }
        }
    }
}
