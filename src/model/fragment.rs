//! Owned tree values: the builder form and the JSON exchange form.
//!
//! A [`Fragment`] is a detached subtree `{type, attributes, children}` (or an
//! inline text run `{type: "text", text, marks}`). The record adapter builds
//! fragments, the presentation layer exchanges them as JSON, and
//! [`Document`](super::Document) loads them into its arena.

use serde::{Deserialize, Deserializer, Serialize};

use super::attrs::{AttrValue, Attributes};
use super::inline::{MarkSet, Run};
use super::node::NodeType;
use crate::error::Error;

/// A detached, owned subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFragment", into = "RawFragment")]
pub struct Fragment {
    pub kind: NodeType,
    pub attrs: Attributes,
    pub children: Vec<Fragment>,
    /// Text content (text runs only).
    pub text: String,
    /// Formatting (text runs only).
    pub marks: MarkSet,
}

impl Fragment {
    /// A node with children and no attributes.
    pub fn node(kind: NodeType, children: Vec<Fragment>) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
            children,
            text: String::new(),
            marks: MarkSet::EMPTY,
        }
    }

    /// A node without children.
    pub fn leaf(kind: NodeType) -> Self {
        Self::node(kind, Vec::new())
    }

    /// An inline text run.
    pub fn text(run: Run) -> Self {
        Self {
            text: run.text,
            marks: run.marks,
            ..Self::leaf(NodeType::Text)
        }
    }

    /// An unformatted inline text run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::text(Run::plain(text))
    }

    /// An inline-text container (`text*`) holding the given runs.
    pub fn field(kind: NodeType, runs: Vec<Run>) -> Self {
        Self::node(kind, runs.into_iter().map(Fragment::text).collect())
    }

    /// A paragraph holding the given inline children.
    pub fn paragraph(children: Vec<Fragment>) -> Self {
        Self::node(NodeType::Paragraph, children)
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Child types in order, as the content model sees them.
    pub fn child_types(&self) -> Vec<NodeType> {
        self.children.iter().map(|c| c.kind).collect()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Fragment::size).sum::<usize>()
    }
}

/// JSON shape of a fragment. Accepts the editor's `attrs`/`content` keys.
#[derive(Debug, Serialize, Deserialize)]
struct RawFragment {
    #[serde(rename = "type")]
    kind: String,
    #[serde(
        default,
        alias = "attrs",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Attributes::is_empty"
    )]
    attributes: Attributes,
    #[serde(
        default,
        alias = "content",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    children: Vec<RawFragment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "marks_empty")]
    marks: MarkSet,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn marks_empty(marks: &MarkSet) -> bool {
    marks.is_empty()
}

impl TryFrom<RawFragment> for Fragment {
    type Error = Error;

    fn try_from(raw: RawFragment) -> Result<Self, Self::Error> {
        let kind = NodeType::from_name(&raw.kind).ok_or(Error::UnknownNodeType(raw.kind))?;
        let children = raw
            .children
            .into_iter()
            .map(Fragment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Fragment {
            kind,
            attrs: raw.attributes,
            children,
            text: raw.text.unwrap_or_default(),
            marks: raw.marks,
        })
    }
}

impl From<Fragment> for RawFragment {
    fn from(fragment: Fragment) -> Self {
        let is_text = fragment.kind == NodeType::Text;
        RawFragment {
            kind: fragment.kind.name().to_string(),
            attributes: fragment.attrs,
            children: fragment.children.into_iter().map(RawFragment::from).collect(),
            text: is_text.then_some(fragment.text),
            marks: fragment.marks,
        }
    }
}

/// Parse a fragment from JSON, reporting unknown node types distinctly.
pub(crate) fn fragment_from_json(json: &str) -> crate::Result<Fragment> {
    let raw: RawFragment = serde_json::from_str(json)?;
    Fragment::try_from(raw)
}

/// Same as [`fragment_from_json`], from an already-parsed value.
pub(crate) fn fragment_from_value(value: serde_json::Value) -> crate::Result<Fragment> {
    let raw: RawFragment = serde_json::from_value(value)?;
    Fragment::try_from(raw)
}
