// goal.rs — Goal: the canonical trackable-objective record.
//
// A Goal lives in three places at once: the engine's in-memory list, the
// durable local snapshot, and (best-effort) the remote page-scoped store.
// This file defines only the record itself plus its construction and merge
// rules; persistence and reconciliation live in nw-cache and nw-sync.
//
// Invariants owned here:
//   - percent_complete = round(100 * completed / total) over action_items
//   - updated_at never decreases
//   - enum fields coerce on the way in, unrecognized values pass through

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fields::{ActionItem, GoalSource, Priority, RelatedFile, Status};

/// The canonical goal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Stable opaque identifier. Generated locally when absent; the remote
    /// store may assign a different one, which replaces it.
    pub id: String,

    /// Owning page scope. Required for remote persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,

    pub title: String,

    #[serde(default)]
    pub detail: String,

    /// Success metric(s), free text.
    #[serde(default)]
    pub metrics: String,

    /// Timeline, free text.
    #[serde(default)]
    pub timeline: String,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub status: Status,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub action_items: Vec<ActionItem>,

    #[serde(default)]
    pub related_files: Vec<RelatedFile>,

    /// Where this goal's projection lives inside a document, if anywhere.
    #[serde(default)]
    pub source: GoalSource,

    /// Derived: 0–100, recomputed whenever action_items change.
    #[serde(default)]
    pub percent_complete: u8,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Construction input for a new goal. Everything optional except the title;
/// missing id/timestamps are generated at construction time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    pub title: String,
    pub detail: String,
    pub metrics: String,
    pub timeline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub action_items: Vec<ActionItem>,
    pub related_files: Vec<RelatedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<GoalSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl GoalDraft {
    /// Convenience constructor for the common title-plus-page case.
    pub fn titled(title: impl Into<String>, page_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page_id: Some(page_id.into()),
            ..Self::default()
        }
    }
}

/// A partial update. Only provided keys are merged; unknown keys arriving
/// over the wire are ignored, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Vec<ActionItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_files: Option<Vec<RelatedFile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<GoalSource>,
}

impl GoalPatch {
    /// A patch carrying every field of `goal` — used when a whole goal is
    /// handed back for synchronization.
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            page_id: goal.page_id.clone(),
            workspace_id: goal.workspace_id.clone(),
            title: Some(goal.title.clone()),
            detail: Some(goal.detail.clone()),
            metrics: Some(goal.metrics.clone()),
            timeline: Some(goal.timeline.clone()),
            priority: Some(goal.priority.clone()),
            status: Some(goal.status.clone()),
            due_date: goal.due_date,
            action_items: Some(goal.action_items.clone()),
            related_files: Some(goal.related_files.clone()),
            source: Some(goal.source.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// round(100 * completed / total); 0 for an empty plan.
pub fn percent_complete(action_items: &[ActionItem]) -> u8 {
    if action_items.is_empty() {
        return 0;
    }
    let completed = action_items.iter().filter(|item| item.completed).count();
    ((completed as f64 / action_items.len() as f64) * 100.0).round() as u8
}

impl Goal {
    /// Build a goal from a draft, generating id and timestamps when absent.
    pub fn from_draft(draft: GoalDraft, now: DateTime<Utc>) -> Self {
        let percent = percent_complete(&draft.action_items);
        Self {
            id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            page_id: draft.page_id,
            workspace_id: draft.workspace_id,
            title: draft.title,
            detail: draft.detail,
            metrics: draft.metrics,
            timeline: draft.timeline,
            priority: draft.priority.unwrap_or_default(),
            status: draft.status.unwrap_or_default(),
            due_date: draft.due_date,
            action_items: draft.action_items,
            related_files: draft.related_files,
            source: draft.source.unwrap_or_default(),
            percent_complete: percent,
            created_at: now,
            updated_at: now,
            created_by: draft.created_by,
        }
    }

    /// Merge a partial update. Only provided keys change; progress is
    /// recomputed when the action plan changed, and `updated_at` is bumped
    /// monotonically (a clock that jumped backwards cannot rewind it).
    pub fn apply(&mut self, patch: &GoalPatch, now: DateTime<Utc>) {
        if let Some(page_id) = &patch.page_id {
            self.page_id = Some(page_id.clone());
        }
        if let Some(workspace_id) = &patch.workspace_id {
            self.workspace_id = Some(workspace_id.clone());
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(detail) = &patch.detail {
            self.detail = detail.clone();
        }
        if let Some(metrics) = &patch.metrics {
            self.metrics = metrics.clone();
        }
        if let Some(timeline) = &patch.timeline {
            self.timeline = timeline.clone();
        }
        if let Some(priority) = &patch.priority {
            self.priority = priority.clone();
        }
        if let Some(status) = &patch.status {
            self.status = status.clone();
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
        if let Some(action_items) = &patch.action_items {
            self.action_items = action_items.clone();
            self.recompute_percent_complete();
        }
        if let Some(related_files) = &patch.related_files {
            self.related_files = related_files.clone();
        }
        if let Some(source) = &patch.source {
            self.source = source.clone();
        }
        self.touch(now);
    }

    /// Recompute the derived progress figure from the action plan.
    pub fn recompute_percent_complete(&mut self) {
        self.percent_complete = percent_complete(&self.action_items);
    }

    /// Bump `updated_at`, keeping it monotonically non-decreasing.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.updated_at);
    }

    /// Case-insensitive title match, used by the dedup-by-title policy.
    pub fn title_matches(&self, other_title: &str) -> bool {
        self.title.trim().to_lowercase() == other_title.trim().to_lowercase()
    }
}
