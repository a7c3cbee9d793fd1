//! Arena-backed résumé document.

use super::attrs::{AttrTable, AttrValue, Attributes};
use super::fragment::{Fragment, fragment_from_json, fragment_from_value};
use super::inline::{Inline, MarkSet, Run};
use super::node::{Node, NodeId, NodeType, TextRange};
use crate::error::{Error, Result};

/// A résumé as a typed tree.
///
/// Nodes live in an arena addressed by [`NodeId`]; the tree uses a
/// parent-pointer / first-child / next-sibling representation. Text runs
/// reference ranges of a shared text buffer. Cloning a document yields a
/// consistent snapshot that later edits to the original cannot affect.
#[derive(Debug, Clone)]
pub struct Document {
    /// All nodes ever allocated (index 0 is always the root).
    nodes: Vec<Node>,
    /// Sparse node attributes.
    attrs: AttrTable,
    /// Shared text buffer (text runs reference ranges into it).
    text: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only an empty `doc` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeType::Doc)],
            attrs: AttrTable::new(),
            text: String::new(),
        }
    }

    /// Load an owned tree into a fresh arena. The root must be a `doc` node.
    ///
    /// No content-model validation happens here; see [`crate::schema::validate`].
    pub fn from_fragment(root: &Fragment) -> Result<Self> {
        if root.kind != NodeType::Doc {
            return Err(Error::InvalidRoot(root.kind));
        }
        let mut doc = Self::from_children(&root.children);
        doc.attrs.set_all(NodeId::ROOT, root.attrs.clone());
        Ok(doc)
    }

    /// Build a document whose `doc` root holds copies of `children`.
    pub fn from_children(children: &[Fragment]) -> Self {
        let mut doc = Self::new();
        for child in children {
            let id = doc.alloc_fragment(child);
            doc.attach(NodeId::ROOT, id);
        }
        doc
    }

    /// Parse the JSON tree form (`{type, attributes, children}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_fragment(&fragment_from_json(json)?)
    }

    /// Same as [`Document::from_json`], from an already-parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Self::from_fragment(&fragment_from_value(value)?)
    }

    /// Copy the whole tree out as an owned fragment.
    pub fn to_fragment(&self) -> Fragment {
        self.fragment_at(NodeId::ROOT)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_fragment())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_fragment())?)
    }

    /// Rebuild the arena from the nodes still reachable from the root.
    ///
    /// Edits never free storage: replaced run text stays in the buffer and
    /// removed subtrees stay in the arena. Compacting drops both. Node IDs
    /// are reassigned, so IDs taken before the call are stale after it.
    pub fn compact(&mut self) {
        let fragment = self.to_fragment();
        let mut doc = Self::from_children(&fragment.children);
        doc.attrs.set_all(NodeId::ROOT, fragment.attrs);
        *self = doc;
    }

    /// Bytes held by the shared text buffer, live or not.
    pub fn text_capacity(&self) -> usize {
        self.text.len()
    }

    /// Get the root node ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Node type of `id`, if it exists.
    pub fn kind(&self, id: NodeId) -> Option<NodeType> {
        self.node(id).map(|n| n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Number of allocated nodes, including unlinked ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocate a detached node and return its ID.
    pub(crate) fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate a detached copy of `fragment` and return the subtree root.
    pub(crate) fn alloc_fragment(&mut self, fragment: &Fragment) -> NodeId {
        let id = if fragment.kind == NodeType::Text {
            let range = self.append_text(&fragment.text);
            self.alloc_node(Node::text(range, fragment.marks))
        } else {
            self.alloc_node(Node::new(fragment.kind))
        };
        self.attrs.set_all(id, fragment.attrs.clone());
        for child in &fragment.children {
            let child_id = self.alloc_fragment(child);
            self.attach(id, child_id);
        }
        id
    }

    /// Append text to the shared buffer and return the range.
    fn append_text(&mut self, text: &str) -> TextRange {
        let start = self.text.len() as u32;
        self.text.push_str(text);
        TextRange::new(start, text.len() as u32)
    }

    /// Text of a range of the shared buffer.
    fn buffer(&self, range: TextRange) -> &str {
        &self.text[range.start as usize..range.end() as usize]
    }

    /// Text of a run node (empty for every other node type).
    pub fn text_of(&self, id: NodeId) -> &str {
        match self.node(id) {
            Some(node) if node.kind == NodeType::Text => self.buffer(node.text),
            _ => "",
        }
    }

    /// Replace the text of a run node.
    ///
    /// The new text is appended; the old range is left in the buffer until
    /// [`Document::compact`].
    pub(crate) fn replace_text(&mut self, id: NodeId, text: &str) {
        let range = self.append_text(text);
        if let Some(node) = self.node_mut(id) {
            node.text = range;
        }
    }

    pub(crate) fn replace_marks(&mut self, id: NodeId, marks: MarkSet) {
        if let Some(node) = self.node_mut(id) {
            node.marks = marks;
        }
    }

    /// Append a detached child as the last child of `parent`.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        let last = self.children(parent).last();
        self.link_after(parent, last, child);
    }

    /// Link a detached child at position `index` among `parent`'s children.
    /// Indices past the end append.
    pub(crate) fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let prev = match index {
            0 => None,
            i => self.children(parent).nth(i - 1).or(self.children(parent).last()),
        };
        self.link_after(parent, prev, child);
    }

    fn link_after(&mut self, parent: NodeId, prev: Option<NodeId>, child: NodeId) {
        let next = match prev {
            Some(p) => self.node(p).and_then(|n| n.next_sibling),
            None => self.node(parent).and_then(|n| n.first_child),
        };
        if let Some(child_node) = self.node_mut(child) {
            child_node.parent = Some(parent);
            child_node.next_sibling = next;
        }
        match prev {
            Some(p) => {
                if let Some(prev_node) = self.node_mut(p) {
                    prev_node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.first_child = Some(child);
                }
            }
        }
    }

    /// Detach `child` from its parent. The node keeps its own subtree.
    pub(crate) fn unlink(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        let next = self.node(child).and_then(|n| n.next_sibling);
        let prev = self
            .children(parent)
            .take_while(|&c| c != child)
            .last();

        match prev {
            Some(p) => {
                if let Some(prev_node) = self.node_mut(p) {
                    prev_node.next_sibling = next;
                }
            }
            None => {
                if let Some(parent_node) = self.node_mut(parent) {
                    parent_node.first_child = next;
                }
            }
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
            node.next_sibling = None;
        }
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            doc: self,
            current: self.node(parent).and_then(|n| n.first_child),
        }
    }

    /// Child types in order.
    pub fn child_types(&self, parent: NodeId) -> Vec<NodeType> {
        self.children(parent)
            .filter_map(|c| self.kind(c))
            .collect()
    }

    /// First child of the given type.
    pub fn child_of_type(&self, parent: NodeId, kind: NodeType) -> Option<NodeId> {
        self.children(parent).find(|&c| self.kind(c) == Some(kind))
    }

    /// All children of the given type, in order.
    pub fn children_of_type(
        &self,
        parent: NodeId,
        kind: NodeType,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&c| self.kind(c) == Some(kind))
    }

    /// Iterate over all linked nodes in depth-first order.
    pub fn iter_dfs(&self) -> DfsIter<'_> {
        self.iter_dfs_from(NodeId::ROOT)
    }

    /// Depth-first iteration over the subtree rooted at `start`.
    pub fn iter_dfs_from(&self, start: NodeId) -> DfsIter<'_> {
        DfsIter {
            doc: self,
            stack: vec![start],
        }
    }

    /// Direct text children of an inline container, as runs.
    ///
    /// Non-text inline children (an `entryTitleSimple` inside a paragraph)
    /// are skipped; use [`Document::plain_text`] to include them.
    pub fn runs(&self, id: NodeId) -> Vec<Run> {
        self.children(id)
            .filter_map(|c| self.node(c))
            .filter(|n| n.kind == NodeType::Text)
            .map(|n| Run::marked(self.buffer(n.text), n.marks))
            .collect()
    }

    /// Inline children of a paragraph: text runs and entry titles.
    pub fn inlines(&self, id: NodeId) -> Vec<Inline> {
        self.children(id)
            .filter_map(|c| {
                let node = self.node(c)?;
                match node.kind {
                    NodeType::Text => Some(Inline::Text(Run::marked(self.buffer(node.text), node.marks))),
                    NodeType::EntryTitleSimple => Some(Inline::Title(self.runs(c))),
                    _ => None,
                }
            })
            .collect()
    }

    /// Concatenated text of every run in the subtree.
    pub fn plain_text(&self, id: NodeId) -> String {
        self.iter_dfs_from(id)
            .map(|n| self.text_of(n))
            .collect()
    }

    pub fn attrs(&self, id: NodeId) -> Option<&Attributes> {
        self.attrs.all(id)
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&AttrValue> {
        self.attrs.get(id, key)
    }

    pub fn attr_str(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attrs.get_str(id, key)
    }

    /// Set an attribute. Attributes are never checked by the content model.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: impl Into<AttrValue>) -> Result<()> {
        if self.node(id).is_none() {
            return Err(Error::NodeNotFound(id.0));
        }
        self.attrs.set(id, key, value.into());
        Ok(())
    }

    /// Type path from the root, with sibling indices: `doc/resumeSection[2]/workEntry[0]`.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            let segment = match node.parent {
                Some(parent) => {
                    let index = self
                        .children(parent)
                        .filter(|&c| self.kind(c) == Some(node.kind))
                        .position(|c| c == node_id)
                        .unwrap_or(0);
                    format!("{}[{index}]", node.kind)
                }
                None => node.kind.to_string(),
            };
            segments.push(segment);
            current = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Copy the subtree rooted at `id` out as an owned fragment.
    pub fn fragment_at(&self, id: NodeId) -> Fragment {
        let Some(node) = self.node(id) else {
            return Fragment::leaf(NodeType::Doc);
        };
        let mut fragment = if node.kind == NodeType::Text {
            Fragment::text(Run::marked(self.buffer(node.text), node.marks))
        } else {
            Fragment::node(
                node.kind,
                self.children(id).map(|c| self.fragment_at(c)).collect(),
            )
        };
        if let Some(attrs) = self.attrs(id) {
            fragment.attrs = attrs.clone();
        }
        fragment
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    doc: &'a Document,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Depth-first iterator over a subtree.
pub struct DfsIter<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.doc.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}
