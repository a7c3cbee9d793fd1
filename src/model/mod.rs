//! Core data model for résumé documents.
//!
//! This module contains:
//! - Node types and the arena tree ([`Document`])
//! - Owned subtrees for building and JSON exchange ([`Fragment`])
//! - Inline runs and formatting marks
//! - Sparse node attributes
//! - Checked structural edits

mod attrs;
mod document;
mod edit;
mod fragment;
mod inline;
mod node;

// Re-export the tree
pub use document::{ChildIter, DfsIter, Document};
pub use fragment::Fragment;
pub use node::{Node, NodeId, NodeType, TextRange};

// Re-export attributes
pub use attrs::{AttrTable, AttrValue, Attributes};

// Re-export inline content
pub use inline::{Inline, Mark, MarkSet, Run, normalize_runs, runs_text};
