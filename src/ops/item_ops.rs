use uuid::Uuid;

use crate::model::item::{Status, TriageItem};

/// Generate a fresh, globally unique item id.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Split a comma-separated tag string into trimmed, non-empty labels,
/// deduplicated by first occurrence (entry order preserved).
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for piece in raw.split(',') {
        let tag = piece.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// The status one column to the left/right of `current`, clamped at the
/// first and last columns. An unrecognized status shifts from the `new`
/// column it displays in.
pub fn shifted_status(current: &Status, delta: isize) -> Status {
    let max = Status::COLUMNS.len() as isize - 1;
    let idx = (current.column_index() as isize + delta).clamp(0, max);
    Status::COLUMNS[idx as usize].clone()
}

/// Find an item by id in the working set.
pub fn find_item<'a>(items: &'a [TriageItem], id: &str) -> Option<&'a TriageItem> {
    items.iter().find(|item| item.id == id)
}
