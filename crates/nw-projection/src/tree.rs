// tree.rs — The abstract document tree supplied by the host engine.
//
// The rich-text engine owns the real node/position model. It hands the
// bridge a read view (kind, text, children, opaque locator) plus one edit
// primitive: transactional text replacement by locator. Locators are
// minted by the host and never interpreted here; a goal stores one as its
// `source.position`.

use crate::error::ProjectionError;

/// Kind of a content node, as reported by the host document engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Heading { level: u8 },
    Paragraph,
    Table,
    TableRow,
    TableCell,
    List,
    /// A plain bullet item.
    ListItem,
    /// A checkbox item.
    TaskItem { checked: bool },
    /// An inline link; the node's text is the link label.
    Link { url: String },
    Other,
}

/// Opaque node address minted by the host document engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLocator(pub String);

impl std::fmt::Display for NodeLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read view of one node in the document tree.
pub trait ContentNode {
    fn kind(&self) -> NodeKind;

    /// The node's visible text content, including descendants.
    fn text(&self) -> String;

    fn children(&self) -> Vec<&dyn ContentNode>;

    fn locator(&self) -> NodeLocator;
}

/// The document contract required from the host engine.
pub trait DocumentHandle {
    /// The document's root node.
    fn root(&self) -> &dyn ContentNode;

    /// Replace a node's text content transactionally.
    fn replace_text(&mut self, locator: &NodeLocator, text: &str) -> Result<(), ProjectionError>;
}

/// Depth-first walk in document order.
pub(crate) fn visit<'a>(node: &'a dyn ContentNode, out: &mut Vec<&'a dyn ContentNode>) {
    out.push(node);
    for child in node.children() {
        visit(child, out);
    }
}

/// Title/label comparison used throughout the bridge: trimmed and
/// case-insensitive, matching the dedup-by-title policy.
pub(crate) fn text_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
