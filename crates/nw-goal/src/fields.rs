// fields.rs — Embedded field types for the Goal entity.
//
// Priority and Status are tolerant enums: parsing matches case- and
// separator-insensitively against the canonical labels, and a value that
// matches nothing is retained verbatim in `Other` rather than rejected.
// The UI only offers the fixed choices, but imported or hand-edited data
// may carry anything; drift is tolerated, not an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How urgent a goal is.
///
/// Serializes as its canonical label ("Critical", "High", ...); an
/// unrecognized value round-trips through [`Priority::Other`] unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    NotSet,
    /// An unrecognized raw value, kept verbatim.
    Other(String),
}

impl Priority {
    /// Parse a raw value into a canonical priority.
    ///
    /// Matching is case-insensitive and ignores spaces, hyphens, and
    /// underscores ("not set", "NOT_SET", "NotSet" all match). Returns
    /// `None` when nothing matches.
    pub fn parse(value: &str) -> Option<Priority> {
        match normalize(value).as_str() {
            "critical" => Some(Priority::Critical),
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            "notset" => Some(Priority::NotSet),
            _ => None,
        }
    }

    /// Parse, falling back to `Other` with the raw value retained.
    pub fn coerce(value: &str) -> Priority {
        Priority::parse(value).unwrap_or_else(|| Priority::Other(value.to_string()))
    }

    /// The canonical label, or the raw value for `Other`.
    pub fn as_str(&self) -> &str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::NotSet => "Not Set",
            Priority::Other(raw) => raw,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::coerce(&value)
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_string()
    }
}

/// Where a goal stands.
///
/// Same tolerance rules as [`Priority`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    NotStarted,
    InProgress,
    Completed,
    Blocked,
    /// An unrecognized raw value, kept verbatim.
    Other(String),
}

impl Status {
    /// Parse a raw value into a canonical status, `None` when nothing matches.
    pub fn parse(value: &str) -> Option<Status> {
        match normalize(value).as_str() {
            "notstarted" => Some(Status::NotStarted),
            "inprogress" => Some(Status::InProgress),
            "completed" => Some(Status::Completed),
            "blocked" => Some(Status::Blocked),
            _ => None,
        }
    }

    /// Parse, falling back to `Other` with the raw value retained.
    pub fn coerce(value: &str) -> Status {
        Status::parse(value).unwrap_or_else(|| Status::Other(value.to_string()))
    }

    /// The canonical label, or the raw value for `Other`.
    pub fn as_str(&self) -> &str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Blocked => "Blocked",
            Status::Other(raw) => raw,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::InProgress
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Status::coerce(&value)
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        value.as_str().to_string()
    }
}

/// Lowercase and strip separators so label variants compare equal.
fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase()
}

/// One step in a goal's action plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl ActionItem {
    pub fn new(text: impl Into<String>, completed: bool) -> Self {
        Self {
            text: text.into(),
            completed,
        }
    }
}

/// A file or link attached to a goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedFile {
    pub name: String,
    pub url: String,
}

/// Which document structure a goal was discovered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A heading section with recognized subsections.
    Heading,
    /// A table row with fixed-index columns.
    Table,
    #[default]
    Unknown,
}

/// Where a goal's projection lives inside a document, if anywhere.
///
/// `position` is an opaque locator minted by the host document engine;
/// this crate never interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSource {
    #[serde(default)]
    pub kind: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}
