use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::item::{Priority, Severity};
use crate::tui::app::{App, DialogField, Mode};
use crate::util::text::{next_grapheme_boundary, prev_grapheme_boundary};

pub(super) fn handle_dialog(app: &mut App, key: KeyEvent) {
    let Some(dialog) = &mut app.dialog else {
        app.mode = Mode::Navigate;
        return;
    };

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.dialog = None;
            app.mode = Mode::Navigate;
        }

        (_, KeyCode::Enter) => app.submit_dialog(),

        // Delete the item being edited (hidden for new items)
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => {
            if let Some(id) = dialog.editing.clone() {
                app.persist_delete(&id);
                app.dialog = None;
                app.mode = Mode::Navigate;
            }
        }

        // Field focus
        (_, KeyCode::Tab) | (_, KeyCode::Down) => focus_next(app, 1),
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => focus_next(app, -1),

        // Enum fields cycle; text fields move the cursor
        (_, KeyCode::Left) => match dialog.field {
            DialogField::Priority => dialog.priority = cycle_priority(dialog.priority, -1),
            DialogField::Severity => dialog.severity = cycle_severity(dialog.severity, -1),
            _ => {
                if let Some(text) = dialog.text_field()
                    && let Some(boundary) = prev_grapheme_boundary(text, dialog.cursor)
                {
                    dialog.cursor = boundary;
                }
            }
        },
        (_, KeyCode::Right) => match dialog.field {
            DialogField::Priority => dialog.priority = cycle_priority(dialog.priority, 1),
            DialogField::Severity => dialog.severity = cycle_severity(dialog.severity, 1),
            _ => {
                if let Some(text) = dialog.text_field()
                    && let Some(boundary) = next_grapheme_boundary(text, dialog.cursor)
                {
                    dialog.cursor = boundary;
                }
            }
        },
        (_, KeyCode::Home) => dialog.cursor = 0,
        (_, KeyCode::End) => {
            if let Some(text) = dialog.text_field() {
                dialog.cursor = text.len();
            }
        }

        // Text editing
        (_, KeyCode::Backspace) => {
            let cursor = dialog.cursor;
            if let Some(text) = dialog.text_field_mut()
                && let Some(boundary) = prev_grapheme_boundary(text, cursor)
            {
                text.drain(boundary..cursor);
                dialog.cursor = boundary;
            }
        }
        (_, KeyCode::Delete) => {
            let cursor = dialog.cursor;
            if let Some(text) = dialog.text_field_mut()
                && let Some(boundary) = next_grapheme_boundary(text, cursor)
            {
                text.drain(cursor..boundary);
            }
        }
        (modifiers, KeyCode::Char(c)) if !modifiers.contains(KeyModifiers::CONTROL) => {
            match dialog.field {
                // Space also cycles the enum fields
                DialogField::Priority if c == ' ' => {
                    dialog.priority = cycle_priority(dialog.priority, 1);
                }
                DialogField::Severity if c == ' ' => {
                    dialog.severity = cycle_severity(dialog.severity, 1);
                }
                _ => {
                    let cursor = dialog.cursor;
                    if let Some(text) = dialog.text_field_mut() {
                        text.insert(cursor, c);
                        dialog.cursor = cursor + c.len_utf8();
                    }
                }
            }
        }

        _ => {}
    }
}

/// Move focus through the field order, wrapping, and park the text cursor
/// at the end of the newly focused field.
fn focus_next(app: &mut App, delta: isize) {
    let Some(dialog) = &mut app.dialog else {
        return;
    };
    let order = DialogField::ORDER;
    let current = order.iter().position(|f| *f == dialog.field).unwrap_or(0);
    let next = (current as isize + delta).rem_euclid(order.len() as isize) as usize;
    dialog.field = order[next];
    dialog.cursor = dialog.text_field().map_or(0, |text| text.len());
}

fn cycle_priority(current: Priority, delta: isize) -> Priority {
    let order = Priority::ALL;
    let idx = order.iter().position(|p| *p == current).unwrap_or(0);
    order[(idx as isize + delta).rem_euclid(order.len() as isize) as usize]
}

fn cycle_severity(current: Severity, delta: isize) -> Severity {
    let order = Severity::ALL;
    let idx = order.iter().position(|s| *s == current).unwrap_or(0);
    order[(idx as isize + delta).rem_euclid(order.len() as isize) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_cycles_wrap_both_ways() {
        assert_eq!(cycle_priority(Priority::Low, 1), Priority::Critical);
        assert_eq!(cycle_priority(Priority::Critical, -1), Priority::Low);
        assert_eq!(cycle_priority(Priority::High, 1), Priority::Medium);
    }

    #[test]
    fn severity_cycles_wrap_both_ways() {
        assert_eq!(cycle_severity(Severity::S4, 1), Severity::S1);
        assert_eq!(cycle_severity(Severity::S1, -1), Severity::S4);
    }
}
