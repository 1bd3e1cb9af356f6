use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::item::{Priority, Status, TriageItem};

/// Active board filters. Empty/None fields impose no constraint; all
/// present constraints are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// Free-text query, matched case-insensitively against title,
    /// description, comma-joined tags, and assignee.
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Case-insensitive exact assignee match
    #[serde(default)]
    pub assignee: Option<String>,
}

impl Filters {
    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.priority.is_some() || self.assignee.is_some()
    }

    pub fn clear(&mut self) {
        *self = Filters::default();
    }

    /// Does this item pass every active constraint?
    pub fn matches(&self, item: &TriageItem) -> bool {
        if let Some(priority) = self.priority
            && item.priority != priority
        {
            return false;
        }

        if let Some(ref assignee) = self.assignee {
            let owner = item.assignee.as_deref().unwrap_or("");
            if !owner.eq_ignore_ascii_case(assignee) {
                return false;
            }
        }

        if !self.query.is_empty() {
            let haystack = format!(
                "{} {} {} {}",
                item.title,
                item.description,
                item.tags.join(","),
                item.assignee.as_deref().unwrap_or("")
            )
            .to_lowercase();
            if !haystack.contains(&self.query.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

/// Project the full collection into per-column buckets: filtered, then
/// sorted by priority rank and due date (absent dates last). The sort is
/// stable, so items that tie keep their fetch order.
///
/// All four columns are always present in the result, in column order.
pub fn visible_items<'a>(
    items: &'a [TriageItem],
    filters: &Filters,
) -> IndexMap<Status, Vec<&'a TriageItem>> {
    let mut buckets: IndexMap<Status, Vec<&TriageItem>> = Status::COLUMNS
        .iter()
        .map(|status| (status.clone(), Vec::new()))
        .collect();

    for item in items.iter().filter(|item| filters.matches(item)) {
        let column = &Status::COLUMNS[item.column_index()];
        buckets[column].push(item);
    }

    for bucket in buckets.values_mut() {
        bucket.sort_by_key(|item| (item.priority.rank(), item.due.is_none(), item.due));
    }

    buckets
}
