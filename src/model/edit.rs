//! Checked structural edits.
//!
//! Every edit computes the child sequence it would produce, checks it against
//! the parent's grammar, and only then touches the arena. A rejected edit
//! leaves the document exactly as it was.

use super::document::Document;
use super::fragment::Fragment;
use super::inline::{MarkSet, Run};
use super::node::{NodeId, NodeType};
use crate::error::{Error, Result};
use crate::schema::{check_children, validate_fragment};

/// Node types that [`Document::split_entry`] can split.
const SPLITTABLE: [NodeType; 3] = [
    NodeType::ProjectEntry,
    NodeType::LeadershipEntry,
    NodeType::ListItem,
];

impl Document {
    /// Insert a copy of `fragment` as child number `index` of `parent`.
    ///
    /// Indices past the end append. Both the parent's resulting children and
    /// the inserted subtree itself must be valid.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        fragment: &Fragment,
    ) -> Result<NodeId> {
        self.kind(parent).ok_or(Error::NodeNotFound(parent.0))?;

        let inner = validate_fragment(fragment);
        if !inner.is_empty() {
            return Err(Error::Structure(inner));
        }

        let mut proposed = self.child_types(parent);
        let index = index.min(proposed.len());
        proposed.insert(index, fragment.kind);
        check_children(self, parent, proposed)?;

        let id = self.alloc_fragment(fragment);
        self.insert_child_at(parent, index, id);
        tracing::trace!(parent = parent.0, child = id.0, kind = %fragment.kind, "inserted node");
        Ok(id)
    }

    /// Append a copy of `fragment` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, fragment: &Fragment) -> Result<NodeId> {
        self.insert_child(parent, usize::MAX, fragment)
    }

    /// Remove `child` from `parent`, returning the removed subtree.
    ///
    /// The removed nodes stay allocated but unlinked; their ids are never
    /// handed out again.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<Fragment> {
        self.kind(child).ok_or(Error::NodeNotFound(child.0))?;
        if self.parent(child) != Some(parent) {
            return Err(Error::InvalidEdit(format!(
                "{} is not a child of {}",
                self.path(child),
                self.path(parent)
            )));
        }

        let proposed: Vec<NodeType> = self
            .children(parent)
            .filter(|&c| c != child)
            .filter_map(|c| self.kind(c))
            .collect();
        check_children(self, parent, proposed)?;

        let removed = self.fragment_at(child);
        self.unlink(child);
        Ok(removed)
    }

    /// Move the child at position `from` of `parent` to position `to`.
    pub fn move_child(&mut self, parent: NodeId, from: usize, to: usize) -> Result<()> {
        let ids: Vec<NodeId> = self.children(parent).collect();
        let Some(&moving) = ids.get(from) else {
            return Err(Error::InvalidEdit(format!(
                "{} has no child at {from}",
                self.path(parent)
            )));
        };

        let mut proposed = self.child_types(parent);
        let kind = proposed.remove(from);
        let to = to.min(proposed.len());
        proposed.insert(to, kind);
        check_children(self, parent, proposed)?;

        self.unlink(moving);
        self.insert_child_at(parent, to, moving);
        Ok(())
    }

    /// Replace the text of a text run.
    ///
    /// The previous text stays allocated; long editing sessions can call
    /// [`Document::compact`] to reclaim it.
    pub fn set_text(&mut self, run: NodeId, text: &str) -> Result<()> {
        self.expect_text(run)?;
        self.replace_text(run, text);
        Ok(())
    }

    /// Replace the marks of a text run.
    pub fn set_marks(&mut self, run: NodeId, marks: MarkSet) -> Result<()> {
        self.expect_text(run)?;
        self.replace_marks(run, marks);
        Ok(())
    }

    fn expect_text(&self, id: NodeId) -> Result<()> {
        match self.kind(id) {
            Some(NodeType::Text) => Ok(()),
            Some(other) => Err(Error::InvalidEdit(format!(
                "{} is a {other}, not a text run",
                self.path(id)
            ))),
            None => Err(Error::NodeNotFound(id.0)),
        }
    }

    /// Split a one-line entry at a character offset of its text.
    ///
    /// The text before `offset` stays in `entry`; the rest moves into a new
    /// sibling of the same type inserted right after it, whose id is
    /// returned. Only project, leadership and bullet lines can be split, and
    /// only where the parent's grammar accepts another sibling of that type.
    pub fn split_entry(&mut self, entry: NodeId, offset: usize) -> Result<NodeId> {
        let kind = self.kind(entry).ok_or(Error::NodeNotFound(entry.0))?;
        if !SPLITTABLE.contains(&kind) {
            return Err(Error::InvalidEdit(format!("{kind} cannot be split")));
        }
        let parent = self
            .parent(entry)
            .ok_or_else(|| Error::InvalidEdit(format!("{} has no parent", self.path(entry))))?;
        let paragraph = self
            .child_of_type(entry, NodeType::Paragraph)
            .ok_or_else(|| Error::InvalidEdit(format!("{} has no paragraph", self.path(entry))))?;

        let mut proposed = Vec::new();
        for child in self.children(parent) {
            proposed.extend(self.kind(child));
            if child == entry {
                proposed.push(kind);
            }
        }
        check_children(self, parent, proposed)?;

        let items = self.fragment_at(paragraph).children;
        let (left, right) = split_inlines(items, offset);

        let index = self
            .children(parent)
            .position(|c| c == entry)
            .unwrap_or_default();

        for child in self.children(paragraph).collect::<Vec<_>>() {
            self.unlink(child);
        }
        for item in &left {
            let id = self.alloc_fragment(item);
            self.attach(paragraph, id);
        }

        let sibling = Fragment::node(kind, vec![Fragment::paragraph(right)]);
        let id = self.alloc_fragment(&sibling);
        self.insert_child_at(parent, index + 1, id);
        tracing::trace!(entry = entry.0, sibling = id.0, offset, "split entry");
        Ok(id)
    }
}

fn char_len(fragment: &Fragment) -> usize {
    if fragment.kind == NodeType::Text {
        fragment.text.chars().count()
    } else {
        fragment.children.iter().map(char_len).sum()
    }
}

/// Split inline items at a character offset, dropping empty pieces.
fn split_inlines(items: Vec<Fragment>, offset: usize) -> (Vec<Fragment>, Vec<Fragment>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut remaining = Some(offset);

    for item in items {
        match remaining {
            None => right.push(item),
            Some(r) => {
                let len = char_len(&item);
                if r > 0 && r >= len {
                    left.push(item);
                    remaining = (r > len).then(|| r - len);
                } else {
                    let (l, rt) = split_fragment(item, r);
                    left.extend(l);
                    right.extend(rt);
                    remaining = None;
                }
            }
        }
    }

    (left, right)
}

fn split_fragment(item: Fragment, offset: usize) -> (Option<Fragment>, Option<Fragment>) {
    if item.kind == NodeType::Text {
        let at = item
            .text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(item.text.len());
        let (head, tail) = item.text.split_at(at);
        let piece = |s: &str| (!s.is_empty()).then(|| Fragment::text(Run::marked(s, item.marks)));
        return (piece(head), piece(tail));
    }

    let (l, r) = split_inlines(item.children, offset);
    let wrap = |children: Vec<Fragment>| {
        (!children.is_empty()).then(|| Fragment {
            attrs: item.attrs.clone(),
            ..Fragment::node(item.kind, children)
        })
    };
    (wrap(l), wrap(r))
}
