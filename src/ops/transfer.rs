use crate::model::item::TriageItem;
use crate::ops::item_ops::fresh_id;

/// Default file name for board exports.
pub const EXPORT_FILE_NAME: &str = "z10triage-export.json";

/// Error type for import/export operations
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("import file is not a JSON array")]
    NotAnArray,
    #[error("could not parse import file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serialize the full collection as a pretty-printed JSON array.
pub fn export_items(items: &[TriageItem]) -> String {
    // Items always have ids by the time they are exported, so this cannot fail
    serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
}

/// Parse an import payload. The document must be a JSON array of
/// item-shaped objects; anything else is rejected before any persistence
/// happens. Records without an id are assigned a fresh one.
pub fn import_items(json: &str) -> Result<Vec<TriageItem>, TransferError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(TransferError::NotAnArray);
    }

    let mut items: Vec<TriageItem> = serde_json::from_value(value)?;
    for item in &mut items {
        if item.id.is_empty() {
            item.id = fresh_id();
        }
    }
    Ok(items)
}
