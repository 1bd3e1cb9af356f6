mod dialog;
mod move_mode;
mod navigate;
mod prompt;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    match app.mode {
        Mode::Navigate => navigate::handle_navigate(app, key),
        Mode::Move => move_mode::handle_move(app, key),
        Mode::Dialog => dialog::handle_dialog(app, key),
        Mode::Input(kind) => prompt::handle_prompt(app, kind, key),
    }
}
