// write.rs — Write canonical goal values back into a document.
//
// The write side locates the same table row or heading block the read
// side would, then replaces cell/section text with the goal's current
// values. A document with no matching projection is a no-op — the goal
// simply has no projection yet.
//
// Planning and editing are two phases: the immutable scan collects
// (locator, text) edits, then the edits are applied through the host's
// transactional replace. Structured sections (action plan, related
// files) are read-only; their items belong to the document author.

use nw_goal::Goal;

use crate::error::ProjectionError;
use crate::read::{recognize_section, Section};
use crate::tree::{text_eq, visit, ContentNode, DocumentHandle, NodeKind, NodeLocator};

/// What a write call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The projection was found and its text updated.
    Updated,
    /// No matching table row or heading block exists yet.
    NoProjection,
}

/// Write `goal`'s current values into its projection in `doc`, if any.
pub fn write(doc: &mut dyn DocumentHandle, goal: &Goal) -> Result<WriteOutcome, ProjectionError> {
    let edits = {
        let root = doc.root();
        plan_table_edits(root, goal).or_else(|| plan_heading_edits(root, goal))
    };

    match edits {
        Some(edits) => {
            for (locator, text) in edits {
                doc.replace_text(&locator, &text)?;
            }
            Ok(WriteOutcome::Updated)
        }
        None => Ok(WriteOutcome::NoProjection),
    }
}

fn due_date_text(goal: &Goal) -> String {
    goal.due_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn plan_table_edits(
    root: &dyn ContentNode,
    goal: &Goal,
) -> Option<Vec<(NodeLocator, String)>> {
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
            if !text_eq(&first.text(), &goal.title) {
                continue;
            }

            // Fixed-index columns: priority / due date / status / detail.
            let values = [
                goal.priority.as_str().to_string(),
                due_date_text(goal),
                goal.status.as_str().to_string(),
                goal.detail.clone(),
            ];
            let edits = cells
                .iter()
                .skip(1)
                .zip(values)
                .map(|(cell, value)| (cell.locator(), value))
                .collect();
            return Some(edits);
        }
    }
    None
}

fn plan_heading_edits(
    root: &dyn ContentNode,
    goal: &Goal,
) -> Option<Vec<(NodeLocator, String)>> {
    let mut parents = Vec::new();
    visit(root, &mut parents);

    for parent in parents {
        let children = parent.children();
        let Some(start) = children.iter().position(|node| {
            matches!(node.kind(), NodeKind::Heading { .. }) && text_eq(&node.text(), &goal.title)
        }) else {
            continue;
        };

        let mut edits = Vec::new();
        let mut current: Option<Section> = None;
        let mut section_body_seen = false;

        for node in &children[start + 1..] {
            if matches!(node.kind(), NodeKind::Heading { .. }) {
                match recognize_section(&node.text()) {
                    Some(section) => {
                        current = Some(section);
                        section_body_seen = false;
                    }
                    None => break,
                }
                continue;
            }

            let Some(section) = current else {
                continue;
            };
            let value = match section {
                Section::Detail => goal.detail.clone(),
                Section::Metrics => goal.metrics.clone(),
                Section::Timeline => goal.timeline.clone(),
                Section::Priority => goal.priority.as_str().to_string(),
                Section::DueDate => due_date_text(goal),
                Section::Status => goal.status.as_str().to_string(),
                // Structured sections are not rewritten.
                Section::ActionPlan | Section::RelatedFiles => continue,
            };

            // The first body node takes the whole value; any further body
            // nodes in the same section are blanked so the section text is
            // replaced, not prepended to.
            if section_body_seen {
                edits.push((node.locator(), String::new()));
            } else {
                edits.push((node.locator(), value));
                section_body_seen = true;
            }
        }
        return Some(edits);
    }
    None
}
