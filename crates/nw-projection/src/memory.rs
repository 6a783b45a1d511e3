// memory.rs — In-memory document tree.
//
// A minimal DocumentHandle implementation for tests, fixtures, and local
// tooling. Locators are stable node ids assigned once at construction, in
// document order, so a scan's locators survive later edits.

use crate::error::ProjectionError;
use crate::tree::{ContentNode, DocumentHandle, NodeKind, NodeLocator};

/// One node of a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    kind: NodeKind,
    text: String,
    children: Vec<MemoryNode>,
    id: usize,
}

impl MemoryNode {
    fn new(kind: NodeKind, text: impl Into<String>, children: Vec<MemoryNode>) -> Self {
        Self {
            kind,
            text: text.into(),
            children,
            id: 0,
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(NodeKind::Heading { level }, text, Vec::new())
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Paragraph, text, Vec::new())
    }

    pub fn list(items: Vec<MemoryNode>) -> Self {
        Self::new(NodeKind::List, "", items)
    }

    pub fn list_item(text: impl Into<String>) -> Self {
        Self::new(NodeKind::ListItem, text, Vec::new())
    }

    pub fn task_item(text: impl Into<String>, checked: bool) -> Self {
        Self::new(NodeKind::TaskItem { checked }, text, Vec::new())
    }

    /// A bullet item holding a single link, as link lists render.
    pub fn link_item(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(
            NodeKind::ListItem,
            "",
            vec![Self::new(
                NodeKind::Link { url: url.into() },
                name,
                Vec::new(),
            )],
        )
    }

    /// A table from rows of cell text.
    pub fn table(rows: Vec<Vec<&str>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|cells| {
                let cells = cells
                    .into_iter()
                    .map(|cell| Self::new(NodeKind::TableCell, cell, Vec::new()))
                    .collect();
                Self::new(NodeKind::TableRow, "", cells)
            })
            .collect();
        Self::new(NodeKind::Table, "", rows)
    }

    fn flat_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        for child in &self.children {
            let text = child.flat_text();
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }

    fn assign_ids(&mut self, next: &mut usize) {
        self.id = *next;
        *next += 1;
        for child in &mut self.children {
            child.assign_ids(next);
        }
    }

    fn find_mut(&mut self, id: usize) -> Option<&mut MemoryNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }
}

impl ContentNode for MemoryNode {
    fn kind(&self) -> NodeKind {
        self.kind.clone()
    }

    fn text(&self) -> String {
        self.flat_text()
    }

    fn children(&self) -> Vec<&dyn ContentNode> {
        self.children.iter().map(|c| c as &dyn ContentNode).collect()
    }

    fn locator(&self) -> NodeLocator {
        NodeLocator(format!("n{}", self.id))
    }
}

/// An in-memory document with stable node locators.
pub struct MemoryDocument {
    root: MemoryNode,
}

impl MemoryDocument {
    pub fn new(children: Vec<MemoryNode>) -> Self {
        let mut root = MemoryNode::new(NodeKind::Document, "", children);
        let mut next = 0;
        root.assign_ids(&mut next);
        Self { root }
    }
}

impl DocumentHandle for MemoryDocument {
    fn root(&self) -> &dyn ContentNode {
        &self.root
    }

    fn replace_text(&mut self, locator: &NodeLocator, text: &str) -> Result<(), ProjectionError> {
        let id: usize = locator
            .0
            .strip_prefix('n')
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| ProjectionError::StaleLocator(locator.0.clone()))?;

        let node = self
            .root
            .find_mut(id)
            .ok_or_else(|| ProjectionError::StaleLocator(locator.0.clone()))?;

        // Replacing a node's text content collapses any inline children.
        node.text = text.to_string();
        node.children.clear();
        Ok(())
    }
}
