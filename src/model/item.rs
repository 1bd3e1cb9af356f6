use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Column placement of an item on the board.
///
/// Stored values written by other tools may carry a status string this
/// version does not know; those round-trip unchanged through [`Status::Other`]
/// and display in the `new` column without being rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    New,
    InProgress,
    Blocked,
    Done,
    /// Unrecognized stored value, preserved verbatim.
    Other(String),
}

impl Status {
    /// The four fixed board columns, in display order.
    pub const COLUMNS: [Status; 4] = [
        Status::New,
        Status::InProgress,
        Status::Blocked,
        Status::Done,
    ];

    /// The stored string form (`new`, `in_progress`, `blocked`, `done`).
    pub fn key(&self) -> &str {
        match self {
            Status::New => "new",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
            Status::Done => "done",
            Status::Other(raw) => raw,
        }
    }

    /// Column header label
    pub fn label(&self) -> &'static str {
        match self.column_index() {
            0 => "New",
            1 => "In Progress",
            2 => "Blocked",
            _ => "Done",
        }
    }

    /// Parse a known status string
    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "new" => Some(Status::New),
            "in_progress" => Some(Status::InProgress),
            "blocked" => Some(Status::Blocked),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    /// Index of the column this status displays in. Unrecognized values
    /// land in the first (`new`) column.
    pub fn column_index(&self) -> usize {
        match self {
            Status::New | Status::Other(_) => 0,
            Status::InProgress => 1,
            Status::Blocked => 2,
            Status::Done => 3,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::New
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Status::parse(&raw).unwrap_or(Status::Other(raw)))
    }
}

/// Item priority. New items default to `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    #[default]
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// Sort rank: Critical first
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Informational severity tag. Never used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Severity {
    S1,
    S2,
    #[default]
    S3,
    S4,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::S1, Severity::S2, Severity::S3, Severity::S4];

    pub fn label(self) -> &'static str {
        match self {
            Severity::S1 => "S1",
            Severity::S2 => "S2",
            Severity::S3 => "S3",
            Severity::S4 => "S4",
        }
    }

    pub fn parse(s: &str) -> Option<Severity> {
        match s.to_ascii_uppercase().as_str() {
            "S1" => Some(Severity::S1),
            "S2" => Some(Severity::S2),
            "S3" => Some(Severity::S3),
            "S4" => Some(Severity::S4),
            _ => None,
        }
    }
}

/// A single unit of trackable work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageItem {
    /// Unique id, assigned once at creation. Empty only transiently for
    /// imported records that have not been assigned one yet.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de_due")]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub status: Status,
}

/// Accept a due date as an ISO string, tolerating null/absent.
fn de_due<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid due date {s:?}: {e}"))),
    }
}

impl TriageItem {
    /// Create a new item with the given id and title; everything else defaulted.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        TriageItem {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            severity: Severity::default(),
            assignee: None,
            tags: Vec::new(),
            due: None,
            status: Status::default(),
        }
    }

    /// Board column this item displays in.
    pub fn column_index(&self) -> usize {
        self.status.column_index()
    }
}
