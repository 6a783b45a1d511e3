// read.rs — Scan a document for a goal's projection by title.
//
// Two layouts are recognized, in precedence order:
//
//   1. A table row whose first cell equals the goal title. Subsequent
//      fixed-index columns map to priority / due date / status / detail.
//   2. A heading equal to the goal title, followed by recognized
//      subsection headings whose body content populates the matching
//      field. The first unrecognized heading ends the scan.
//
// Reading never fails; a document without a matching projection yields
// None. Field values are coerced with the entity model's tolerance rules,
// and text that does not parse as a date leaves the due date unset.

use chrono::NaiveDate;
use nw_goal::{
    ActionItem, GoalDraft, GoalSource, Priority, RelatedFile, SourceKind, Status,
};

use crate::tree::{text_eq, visit, ContentNode, DocumentHandle, NodeKind};

/// Field values extracted from a document projection.
#[derive(Debug, Clone, Default)]
pub struct GoalProjection {
    pub title: String,
    pub detail: Option<String>,
    pub metrics: Option<String>,
    pub timeline: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDate>,
    pub action_items: Vec<ActionItem>,
    pub related_files: Vec<RelatedFile>,
    pub source: GoalSource,
}

impl GoalProjection {
    /// Turn the extracted fields into construction input for the engine.
    pub fn into_draft(self, page_id: Option<String>) -> GoalDraft {
        GoalDraft {
            page_id,
            title: self.title,
            detail: self.detail.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
            timeline: self.timeline.unwrap_or_default(),
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
            action_items: self.action_items,
            related_files: self.related_files,
            source: Some(self.source),
            ..GoalDraft::default()
        }
    }
}

/// The recognized subsection headings of a heading-based projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Detail,
    Metrics,
    Timeline,
    Priority,
    DueDate,
    Status,
    ActionPlan,
    RelatedFiles,
}

pub(crate) fn recognize_section(label: &str) -> Option<Section> {
    let label = label.trim().trim_end_matches(':').trim().to_lowercase();
    match label.as_str() {
        "detail" => Some(Section::Detail),
        "success metric" | "success metrics" => Some(Section::Metrics),
        "timeline" => Some(Section::Timeline),
        "priority" => Some(Section::Priority),
        "due date" => Some(Section::DueDate),
        "status" => Some(Section::Status),
        "action plan" => Some(Section::ActionPlan),
        "related files" => Some(Section::RelatedFiles),
        _ => None,
    }
}

/// Scan `doc` for a projection of the goal titled `goal_title`.
///
/// A table row takes precedence over a heading block with the same title.
pub fn read(doc: &dyn DocumentHandle, goal_title: &str) -> Option<GoalProjection> {
    let root = doc.root();
    scan_tables(root, goal_title).or_else(|| scan_headings(root, goal_title))
}

fn scan_tables(root: &dyn ContentNode, title: &str) -> Option<GoalProjection> {
    let mut nodes = Vec::new();
    visit(root, &mut nodes);

    for node in nodes {
        if node.kind() != NodeKind::Table {
            continue;
        }
        for row in node.children() {
            if row.kind() != NodeKind::TableRow {
                continue;
            }
            let cells: Vec<&dyn ContentNode> = row
                .children()
                .into_iter()
                .filter(|c| c.kind() == NodeKind::TableCell)
                .collect();
            let Some(first) = cells.first() else {
                continue;
            };
            if !text_eq(&first.text(), title) {
                continue;
            }

            let cell_text = |index: usize| -> Option<String> {
                cells
                    .get(index)
                    .map(|c| c.text().trim().to_string())
                    .filter(|t| !t.is_empty())
            };

            return Some(GoalProjection {
                title: first.text().trim().to_string(),
                priority: cell_text(1).map(|t| Priority::coerce(&t)),
                due_date: cell_text(2).and_then(|t| parse_due_date(&t)),
                status: cell_text(3).map(|t| Status::coerce(&t)),
                detail: cell_text(4),
                source: GoalSource {
                    kind: SourceKind::Table,
                    position: Some(row.locator().0),
                },
                ..GoalProjection::default()
            });
        }
    }
    None
}

fn scan_headings(root: &dyn ContentNode, title: &str) -> Option<GoalProjection> {
    let mut parents = Vec::new();
    visit(root, &mut parents);

    for parent in parents {
        let children = parent.children();
        let Some(start) = children.iter().position(|node| {
            matches!(node.kind(), NodeKind::Heading { .. }) && text_eq(&node.text(), title)
        }) else {
            continue;
        };

        let heading = children[start];
        let mut projection = GoalProjection {
            title: heading.text().trim().to_string(),
            source: GoalSource {
                kind: SourceKind::Heading,
                position: Some(heading.locator().0),
            },
            ..GoalProjection::default()
        };

        let mut current: Option<Section> = None;
        for node in &children[start + 1..] {
            if matches!(node.kind(), NodeKind::Heading { .. }) {
                match recognize_section(&node.text()) {
                    Some(section) => current = Some(section),
                    // An unrecognized heading ends the goal block.
                    None => break,
                }
                continue;
            }
            if let Some(section) = current {
                accumulate(&mut projection, section, *node);
            }
        }
        return Some(projection);
    }
    None
}

fn accumulate(projection: &mut GoalProjection, section: Section, node: &dyn ContentNode) {
    let body = node.text().trim().to_string();
    match section {
        Section::Detail => append_text(&mut projection.detail, &body),
        Section::Metrics => append_text(&mut projection.metrics, &body),
        Section::Timeline => append_text(&mut projection.timeline, &body),
        Section::Priority => {
            if projection.priority.is_none() && !body.is_empty() {
                projection.priority = Some(Priority::coerce(&body));
            }
        }
        Section::DueDate => {
            if projection.due_date.is_none() {
                projection.due_date = parse_due_date(&body);
            }
        }
        Section::Status => {
            if projection.status.is_none() && !body.is_empty() {
                projection.status = Some(Status::coerce(&body));
            }
        }
        Section::ActionPlan => collect_action_items(node, &mut projection.action_items),
        Section::RelatedFiles => collect_related_files(node, &mut projection.related_files),
    }
}

fn append_text(field: &mut Option<String>, body: &str) {
    if body.is_empty() {
        return;
    }
    match field {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(body);
        }
        None => *field = Some(body.to_string()),
    }
}

fn collect_action_items(node: &dyn ContentNode, out: &mut Vec<ActionItem>) {
    match node.kind() {
        NodeKind::TaskItem { checked } => {
            out.push(ActionItem::new(node.text().trim(), checked));
        }
        NodeKind::ListItem => {
            let (text, completed) = strip_checkbox_prefix(&node.text());
            out.push(ActionItem::new(text, completed));
        }
        _ => {
            for child in node.children() {
                collect_action_items(child, out);
            }
        }
    }
}

fn collect_related_files(node: &dyn ContentNode, out: &mut Vec<RelatedFile>) {
    if let NodeKind::Link { url } = node.kind() {
        let text = node.text().trim().to_string();
        out.push(RelatedFile {
            name: if text.is_empty() { url.clone() } else { text },
            url,
        });
        return;
    }
    for child in node.children() {
        collect_related_files(child, out);
    }
}

/// Plain bullet items may carry a markdown-style checkbox prefix.
fn strip_checkbox_prefix(text: &str) -> (String, bool) {
    let trimmed = text.trim();
    for (prefix, completed) in [("[x]", true), ("[X]", true), ("[ ]", false)] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return (rest.trim().to_string(), completed);
        }
    }
    (trimmed.to_string(), false)
}

/// Parse the date formats projections show up with. Anything else leaves
/// the due date unset rather than failing the scan.
pub(crate) fn parse_due_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}
