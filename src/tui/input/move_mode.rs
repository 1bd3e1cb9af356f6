use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Mode};

pub(super) fn handle_move(app: &mut App, key: KeyEvent) {
    match key.code {
        // Retarget the drop column
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(ms) = &mut app.move_state {
                ms.target_column = ms.target_column.saturating_sub(1);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(ms) = &mut app.move_state {
                ms.target_column = (ms.target_column + 1).min(3);
            }
        }

        KeyCode::Enter | KeyCode::Char(' ') => app.drop_grabbed(),

        KeyCode::Esc => {
            app.move_state = None;
            app.mode = Mode::Navigate;
        }

        _ => {}
    }
}
