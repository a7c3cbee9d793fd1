//! Node attributes.
//!
//! Most nodes carry no attributes at all, so the document stores them in a
//! sparse table keyed by node id instead of on every node.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// A scalar or string-array attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// Attribute map of one node, ordered by key for stable output.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Sparse attribute storage for a document.
#[derive(Debug, Default, Clone)]
pub struct AttrTable {
    entries: HashMap<NodeId, Attributes>,
}

impl AttrTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all attributes of a node. An empty map removes the entry.
    pub fn set_all(&mut self, node: NodeId, attrs: Attributes) {
        if attrs.is_empty() {
            self.entries.remove(&node);
        } else {
            self.entries.insert(node, attrs);
        }
    }

    /// Set a single attribute.
    pub fn set(&mut self, node: NodeId, key: &str, value: AttrValue) {
        self.entries
            .entry(node)
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn get(&self, node: NodeId, key: &str) -> Option<&AttrValue> {
        self.entries.get(&node).and_then(|attrs| attrs.get(key))
    }

    /// Get a string attribute.
    pub fn get_str(&self, node: NodeId, key: &str) -> Option<&str> {
        self.get(node, key).and_then(AttrValue::as_str)
    }

    /// All attributes of a node, if it has any.
    pub fn all(&self, node: NodeId) -> Option<&Attributes> {
        self.entries.get(&node)
    }

    pub fn remove_node(&mut self, node: NodeId) {
        self.entries.remove(&node);
    }

    /// Number of nodes carrying attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_table() {
        let mut table = AttrTable::new();
        let node = NodeId(3);

        table.set(node, "type", "email".into());
        table.set(node, "value", "a@b.c".into());

        assert_eq!(table.get_str(node, "type"), Some("email"));
        assert_eq!(table.get_str(node, "value"), Some("a@b.c"));
        assert_eq!(table.get_str(NodeId(4), "type"), None);
        assert_eq!(table.len(), 1);

        table.set_all(node, Attributes::new());
        assert!(table.is_empty());
    }

    #[test]
    fn test_untagged_values() {
        let attrs: Attributes = serde_json::from_value(serde_json::json!({
            "level": 1,
            "skills": ["Rust", "SQL"],
            "title": "Compiler",
            "type": null,
            "wide": true
        }))
        .unwrap();

        assert_eq!(attrs["level"], AttrValue::Int(1));
        assert_eq!(
            attrs["skills"].as_list(),
            Some(&["Rust".to_string(), "SQL".to_string()][..])
        );
        assert_eq!(attrs["title"].as_str(), Some("Compiler"));
        assert_eq!(attrs["type"], AttrValue::Null);
        assert_eq!(attrs["wide"], AttrValue::Bool(true));
    }
}
