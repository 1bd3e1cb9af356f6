use std::fs;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use indexmap::IndexMap;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use serde::{Deserialize, Serialize};

use crate::io::config_io::read_config;
use crate::io::store::{Store, discover_board};
use crate::io::watcher::BoardWatcher;
use crate::model::config::BoardConfig;
use crate::model::item::{Priority, Severity, Status, TriageItem};
use crate::ops::filter::{Filters, visible_items};
use crate::ops::item_ops::{find_item, fresh_id, parse_tags, shifted_status};
use crate::ops::transfer::{EXPORT_FILE_NAME, export_items, import_items};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// A card is grabbed and riding the column keys (drag-and-drop)
    Move,
    /// The new/edit item dialog is open
    Dialog,
    /// A one-line prompt is active at the status row
    Input(InputKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Query,
    Assignee,
    ImportPath,
}

/// A grabbed card: the drag payload is the item id, the drop target is a
/// column index.
#[derive(Debug, Clone)]
pub struct MoveState {
    pub item_id: String,
    pub target_column: usize,
}

/// Fields of the item dialog, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Title,
    Description,
    Priority,
    Severity,
    Assignee,
    Tags,
    Due,
}

impl DialogField {
    pub const ORDER: [DialogField; 7] = [
        DialogField::Title,
        DialogField::Description,
        DialogField::Priority,
        DialogField::Severity,
        DialogField::Assignee,
        DialogField::Tags,
        DialogField::Due,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DialogField::Title => "title",
            DialogField::Description => "description",
            DialogField::Priority => "priority",
            DialogField::Severity => "severity",
            DialogField::Assignee => "assignee",
            DialogField::Tags => "tags",
            DialogField::Due => "due",
        }
    }
}

/// State of the new/edit item dialog
#[derive(Debug, Clone)]
pub struct DialogState {
    /// Id of the item being edited; None when creating
    pub editing: Option<String>,
    pub field: DialogField,
    pub title: String,
    pub description: String,
    pub assignee: String,
    /// Comma-separated tag string, split on submit
    pub tags: String,
    /// Due date text, `YYYY-MM-DD` or empty
    pub due: String,
    pub priority: Priority,
    pub severity: Severity,
    /// Byte offset of the text cursor in the focused text field
    pub cursor: usize,
}

impl DialogState {
    /// Blank dialog for a new item (priority preselected to the default)
    pub fn new_item() -> Self {
        DialogState {
            editing: None,
            field: DialogField::Title,
            title: String::new(),
            description: String::new(),
            assignee: String::new(),
            tags: String::new(),
            due: String::new(),
            priority: Priority::default(),
            severity: Severity::default(),
            cursor: 0,
        }
    }

    /// Dialog prefilled from an existing item
    pub fn edit(item: &TriageItem) -> Self {
        DialogState {
            editing: Some(item.id.clone()),
            field: DialogField::Title,
            title: item.title.clone(),
            description: item.description.clone(),
            assignee: item.assignee.clone().unwrap_or_default(),
            tags: item.tags.join(", "),
            due: item.due.map(|d| d.to_string()).unwrap_or_default(),
            priority: item.priority,
            severity: item.severity,
            cursor: item.title.len(),
        }
    }

    /// The focused text field's buffer, if the focused field is textual.
    pub fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.field {
            DialogField::Title => Some(&mut self.title),
            DialogField::Description => Some(&mut self.description),
            DialogField::Assignee => Some(&mut self.assignee),
            DialogField::Tags => Some(&mut self.tags),
            DialogField::Due => Some(&mut self.due),
            DialogField::Priority | DialogField::Severity => None,
        }
    }

    pub fn text_field(&self) -> Option<&String> {
        match self.field {
            DialogField::Title => Some(&self.title),
            DialogField::Description => Some(&self.description),
            DialogField::Assignee => Some(&self.assignee),
            DialogField::Tags => Some(&self.tags),
            DialogField::Due => Some(&self.due),
            DialogField::Priority | DialogField::Severity => None,
        }
    }

    /// Build the item this dialog describes. Text fields are trimmed, the
    /// tag string split and deduplicated; `status` is the status the item
    /// should carry (existing status when editing, `new` when creating).
    pub fn to_item(&self, id: String, status: Status) -> Result<TriageItem, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("title is required".to_string());
        }

        let due_text = self.due.trim();
        let due = if due_text.is_empty() {
            None
        } else {
            Some(
                due_text
                    .parse()
                    .map_err(|_| format!("due must be YYYY-MM-DD, got {due_text:?}"))?,
            )
        };

        let assignee = self.assignee.trim();
        Ok(TriageItem {
            id,
            title: title.to_string(),
            description: self.description.trim().to_string(),
            priority: self.priority,
            severity: self.severity,
            assignee: (!assignee.is_empty()).then(|| assignee.to_string()),
            tags: parse_tags(&self.tags),
            due,
            status,
        })
    }
}

/// Session state persisted in the store's kv collection under key `"ui"`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionState {
    #[serde(default)]
    filters: Filters,
    #[serde(default)]
    column: usize,
}

const SESSION_KEY: &str = "ui";

/// Main application state. Owned by the event loop and passed explicitly
/// through every handler; the store is the sole owner of durable state and
/// `items` is a cache reloaded after each persisted mutation.
pub struct App {
    pub store: Store,
    pub config: BoardConfig,
    pub theme: Theme,
    pub items: Vec<TriageItem>,
    pub filters: Filters,
    pub mode: Mode,
    pub cursor_column: usize,
    pub cursor_row: usize,
    /// Per-column scroll offsets (display rows), adjusted during render
    pub column_scroll: [usize; 4],
    pub dialog: Option<DialogState>,
    pub move_state: Option<MoveState>,
    /// Buffer for the one-line prompt in `Mode::Input`
    pub input_buffer: String,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Store, config: BoardConfig) -> Self {
        let theme = Theme::from_config(&config.ui);
        App {
            store,
            config,
            theme,
            items: Vec::new(),
            filters: Filters::default(),
            mode: Mode::Navigate,
            cursor_column: 0,
            cursor_row: 0,
            column_scroll: [0; 4],
            dialog: None,
            move_state: None,
            input_buffer: String::new(),
            show_help: false,
            status_message: None,
            status_is_error: false,
            should_quit: false,
        }
    }

    /// The visible per-column buckets for the current working set + filters
    pub fn buckets(&self) -> IndexMap<Status, Vec<&TriageItem>> {
        visible_items(&self.items, &self.filters)
    }

    /// Id of the card under the cursor, if the cursor column has one there
    pub fn cursor_item_id(&self) -> Option<String> {
        let buckets = self.buckets();
        let (_, bucket) = buckets.get_index(self.cursor_column)?;
        bucket.get(self.cursor_row).map(|item| item.id.clone())
    }

    /// Keep the cursor inside its (possibly shrunken) bucket
    pub fn clamp_cursor(&mut self) {
        let buckets = self.buckets();
        let len = buckets
            .get_index(self.cursor_column)
            .map_or(0, |(_, b)| b.len());
        self.cursor_row = self.cursor_row.min(len.saturating_sub(1));
    }

    /// Refresh the working set from the store (the reload half of every
    /// persist-then-reload mutation cycle).
    pub fn reload(&mut self) {
        match self.store.get_all() {
            Ok(items) => self.items = items,
            Err(e) => self.report_error(e),
        }
        self.clamp_cursor();
    }

    /// Move the cursor to wherever the given item now renders
    pub fn follow_item(&mut self, id: &str) {
        let target = self.buckets().iter().enumerate().find_map(|(column, (_, bucket))| {
            bucket
                .iter()
                .position(|item| item.id == id)
                .map(|row| (column, row))
        });
        match target {
            Some((column, row)) => {
                self.cursor_column = column;
                self.cursor_row = row;
            }
            None => self.clamp_cursor(),
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn report_error(&mut self, error: impl std::fmt::Display) {
        self.status_message = Some(error.to_string());
        self.status_is_error = true;
    }

    /// Persist an upsert, then reload and chase the item
    pub fn persist_put(&mut self, item: TriageItem) {
        let id = item.id.clone();
        match self.store.put(&item) {
            Ok(()) => {
                self.reload();
                self.follow_item(&id);
            }
            Err(e) => self.report_error(e),
        }
    }

    /// Persist a deletion, then reload
    pub fn persist_delete(&mut self, id: &str) {
        match self.store.delete(id) {
            Ok(()) => self.reload(),
            Err(e) => self.report_error(e),
        }
    }

    /// Move the cursor card one column left/right, clamped at the edges.
    /// A clamped move changes nothing and persists nothing.
    pub fn move_cursor_item(&mut self, delta: isize) {
        let Some(id) = self.cursor_item_id() else {
            return;
        };
        let Some(item) = find_item(&self.items, &id) else {
            return;
        };
        let status = shifted_status(&item.status, delta);
        if status == item.status {
            return;
        }
        let mut updated = item.clone();
        updated.status = status;
        self.persist_put(updated);
    }

    /// Grab the cursor card for a move (drag start: the payload is its id)
    pub fn grab_cursor_item(&mut self) {
        if let Some(id) = self.cursor_item_id() {
            self.move_state = Some(MoveState {
                item_id: id,
                target_column: self.cursor_column,
            });
            self.mode = Mode::Move;
        }
    }

    /// Drop the grabbed card on its target column. A payload id that no
    /// longer resolves to a known item drops as a silent no-op.
    pub fn drop_grabbed(&mut self) {
        let Some(move_state) = self.move_state.take() else {
            return;
        };
        self.mode = Mode::Navigate;

        let Some(item) = find_item(&self.items, &move_state.item_id) else {
            return;
        };
        let mut updated = item.clone();
        updated.status = Status::COLUMNS[move_state.target_column.min(3)].clone();
        self.persist_put(updated);
    }

    /// Write the full collection to `z10triage-export.json` in the
    /// current directory.
    pub fn export_board(&mut self) {
        let json = export_items(&self.items);
        match fs::write(EXPORT_FILE_NAME, json) {
            Ok(()) => self.notify(format!(
                "exported {} items to {}",
                self.items.len(),
                EXPORT_FILE_NAME
            )),
            Err(e) => self.report_error(format!("export failed: {e}")),
        }
    }

    /// Read and import a JSON file: shape-checked before any persistence,
    /// missing ids synthesized, the whole list bulk-upserted.
    pub fn import_board(&mut self, path: &str) {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                self.report_error(format!("could not read {path}: {e}"));
                return;
            }
        };
        let items = match import_items(&text) {
            Ok(items) => items,
            Err(e) => {
                self.report_error(e);
                return;
            }
        };
        let count = items.len();
        match self.store.bulk_put(&items) {
            Ok(()) => {
                self.reload();
                self.notify(format!("imported {count} items"));
            }
            Err(e) => self.report_error(e),
        }
    }

    /// Open the dialog editing the cursor card
    pub fn open_edit_dialog(&mut self) {
        let Some(id) = self.cursor_item_id() else {
            return;
        };
        if let Some(item) = find_item(&self.items, &id) {
            self.dialog = Some(DialogState::edit(item));
            self.mode = Mode::Dialog;
        }
    }

    pub fn open_new_dialog(&mut self) {
        self.dialog = Some(DialogState::new_item());
        self.mode = Mode::Dialog;
    }

    /// Submit the dialog: upsert and close, or surface the problem and
    /// keep the dialog open.
    pub fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.clone() else {
            return;
        };
        let (id, status) = match &dialog.editing {
            Some(id) => {
                let status = find_item(&self.items, id)
                    .map(|item| item.status.clone())
                    .unwrap_or_default();
                (id.clone(), status)
            }
            None => (fresh_id(), Status::New),
        };
        match dialog.to_item(id, status) {
            Ok(item) => {
                self.persist_put(item);
                self.dialog = None;
                self.mode = Mode::Navigate;
            }
            Err(message) => self.report_error(message),
        }
    }

    fn restore_session(&mut self) {
        let Ok(Some(value)) = self.store.kv_get(SESSION_KEY) else {
            return;
        };
        if let Ok(session) = serde_json::from_value::<SessionState>(value) {
            self.filters = session.filters;
            self.cursor_column = session.column.min(3);
            self.clamp_cursor();
        }
    }

    fn save_session(&self) {
        let session = SessionState {
            filters: self.filters.clone(),
            column: self.cursor_column,
        };
        if let Ok(value) = serde_json::to_value(&session) {
            let _ = self.store.kv_put(SESSION_KEY, value);
        }
    }
}

/// Run the TUI application
pub fn run(board_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match board_dir {
        Some(dir) => fs::canonicalize(dir)?,
        None => std::env::current_dir()?,
    };
    let board_dir = discover_board(&start)?;
    let config = read_config(&board_dir)?;
    let store = Store::new(&board_dir);

    let mut app = App::new(store, config);
    app.reload();
    app.restore_session();

    // A watcher failure only costs external-change refresh; the board
    // itself still works
    let watcher = BoardWatcher::start(&board_dir).ok();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal even if we panic mid-draw
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    app.save_session();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&BoardWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        // Another process wrote the store: refresh the working set
        if let Some(watcher) = watcher
            && !watcher.poll().is_empty()
        {
            app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_with_items(tmp: &TempDir, items: &[TriageItem]) -> App {
        let store = Store::new(tmp.path().join("z10"));
        store.bulk_put(items).unwrap();
        let mut app = App::new(store, BoardConfig::default());
        app.reload();
        app
    }

    #[test]
    fn dropping_a_vanished_id_leaves_the_store_untouched() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(
            &tmp,
            &[TriageItem::new("a", "First"), TriageItem::new("b", "Second")],
        );
        let before = fs::read(app.store.file_path()).unwrap();

        app.move_state = Some(MoveState {
            item_id: "gone".into(),
            target_column: 3,
        });
        app.mode = Mode::Move;
        app.drop_grabbed();

        assert_eq!(app.mode, Mode::Navigate);
        let after = fs::read(app.store.file_path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn drop_moves_the_item_to_the_target_column() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[TriageItem::new("a", "First")]);

        app.move_state = Some(MoveState {
            item_id: "a".into(),
            target_column: 2,
        });
        app.mode = Mode::Move;
        app.drop_grabbed();

        assert_eq!(app.items[0].status, Status::Blocked);
        // Durable, not just in memory
        assert_eq!(app.store.get_all().unwrap()[0].status, Status::Blocked);
    }

    #[test]
    fn clamped_keyboard_move_changes_nothing_on_disk() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[TriageItem::new("a", "First")]);
        let before = fs::read(app.store.file_path()).unwrap();

        // Item is in the first column; moving left must not underflow
        app.move_cursor_item(-1);
        assert_eq!(app.items[0].status, Status::New);
        assert_eq!(before, fs::read(app.store.file_path()).unwrap());

        // And in the last column, moving right must not overflow
        let mut done = app.items[0].clone();
        done.status = Status::Done;
        app.persist_put(done);
        let before = fs::read(app.store.file_path()).unwrap();
        app.move_cursor_item(1);
        assert_eq!(app.items[0].status, Status::Done);
        assert_eq!(before, fs::read(app.store.file_path()).unwrap());
    }

    #[test]
    fn keyboard_move_advances_one_column_and_follows() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[TriageItem::new("a", "First")]);

        app.move_cursor_item(1);
        assert_eq!(app.items[0].status, Status::InProgress);
        assert_eq!(app.cursor_column, 1);
        assert_eq!(app.cursor_row, 0);
    }

    #[test]
    fn submit_new_dialog_creates_an_item_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[]);
        app.open_new_dialog();
        app.dialog.as_mut().unwrap().title = "  Fix login  ".into();
        app.dialog.as_mut().unwrap().tags = "auth, auth, ui".into();
        app.submit_dialog();

        assert!(app.dialog.is_none());
        assert_eq!(app.items.len(), 1);
        let item = &app.items[0];
        assert!(!item.id.is_empty());
        assert_eq!(item.title, "Fix login");
        assert_eq!(item.priority, Priority::High);
        assert_eq!(item.status, Status::New);
        assert_eq!(item.tags, vec!["auth", "ui"]);
    }

    #[test]
    fn submit_edit_dialog_keeps_id_and_status() {
        let tmp = TempDir::new().unwrap();
        let mut original = TriageItem::new("keep", "Old");
        original.status = Status::Blocked;
        let mut app = app_with_items(&tmp, &[original]);
        app.cursor_column = 2;
        app.open_edit_dialog();
        app.dialog.as_mut().unwrap().title = "New".into();
        app.submit_dialog();

        assert_eq!(app.items.len(), 1);
        assert_eq!(app.items[0].id, "keep");
        assert_eq!(app.items[0].title, "New");
        assert_eq!(app.items[0].status, Status::Blocked);
    }

    #[test]
    fn empty_title_keeps_the_dialog_open_with_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[]);
        app.open_new_dialog();
        app.submit_dialog();

        assert!(app.dialog.is_some());
        assert!(app.status_is_error);
        assert!(app.items.is_empty());
    }

    #[test]
    fn import_rejects_non_array_without_side_effects() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[TriageItem::new("a", "First")]);
        let payload = tmp.path().join("bad.json");
        fs::write(&payload, r#"{"title":"not a list"}"#).unwrap();
        let before = fs::read(app.store.file_path()).unwrap();

        app.import_board(payload.to_str().unwrap());

        assert!(app.status_is_error);
        assert_eq!(before, fs::read(app.store.file_path()).unwrap());
        assert_eq!(app.items.len(), 1);
    }

    #[test]
    fn import_synthesizes_ids_and_overwrites_matches() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[TriageItem::new("a", "Old title")]);
        let payload = tmp.path().join("in.json");
        fs::write(
            &payload,
            r#"[{"id":"a","title":"Replaced"},{"title":"Fresh"}]"#,
        )
        .unwrap();

        app.import_board(payload.to_str().unwrap());

        assert_eq!(app.items.len(), 2);
        assert_eq!(app.items[0].title, "Replaced");
        assert!(!app.items[1].id.is_empty());
        assert_eq!(app.items[1].title, "Fresh");
    }

    #[test]
    fn session_round_trips_through_the_kv_store() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_items(&tmp, &[]);
        app.filters.query = "login".into();
        app.cursor_column = 2;
        app.save_session();

        let store = Store::new(tmp.path().join("z10"));
        let mut fresh = App::new(store, BoardConfig::default());
        fresh.reload();
        fresh.restore_session();
        assert_eq!(fresh.filters.query, "login");
        assert_eq!(fresh.cursor_column, 2);
    }
}
