use serde::Serialize;

use crate::model::item::{Priority, Severity, Status, TriageItem};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub id: String,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl From<&TriageItem> for ItemJson {
    fn from(item: &TriageItem) -> Self {
        ItemJson {
            id: item.id.clone(),
            title: item.title.clone(),
            status: item.status.clone(),
            priority: item.priority,
            severity: item.severity,
            assignee: item.assignee.clone(),
            tags: item.tags.clone(),
            due: item.due.map(|d| d.to_string()),
            description: item.description.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub status: Status,
    pub count: usize,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub columns: Vec<ColumnJson>,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// One-line rendering of an item for `zt list`
pub fn format_item_line(item: &TriageItem) -> String {
    let mut line = format!("[{}] {} \u{2014} {}", item.priority.label(), item.id, item.title);
    if let Some(assignee) = &item.assignee {
        line.push_str(&format!(" @{assignee}"));
    }
    for tag in &item.tags {
        line.push_str(&format!(" #{tag}"));
    }
    if let Some(due) = item.due {
        line.push_str(&format!(" due:{due}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_line_includes_owner_tags_and_due() {
        let mut item = TriageItem::new("abc", "Fix login");
        item.assignee = Some("sam".into());
        item.tags = vec!["auth".into()];
        item.due = "2025-02-01".parse().ok();

        let line = format_item_line(&item);
        assert!(line.contains("[High]"));
        assert!(line.contains("abc"));
        assert!(line.contains("@sam"));
        assert!(line.contains("#auth"));
        assert!(line.contains("due:2025-02-01"));
    }

    #[test]
    fn item_json_drops_empty_fields() {
        let item = TriageItem::new("abc", "Bare");
        let json = serde_json::to_value(ItemJson::from(&item)).unwrap();
        assert!(json.get("assignee").is_none());
        assert!(json.get("tags").is_none());
        assert!(json.get("due").is_none());
        assert!(json.get("description").is_none());
        assert_eq!(json["status"], "new");
    }
}
