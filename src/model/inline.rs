//! Inline formatting: marks, mark sets and text runs.

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A formatting tag attachable to a run of text.
///
/// Declaration order is the canonical serialization order, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Highlight,
}

impl Mark {
    /// All marks in canonical order.
    pub const ALL: [Mark; 4] = [Mark::Bold, Mark::Italic, Mark::Underline, Mark::Highlight];

    fn bit(self) -> u8 {
        match self {
            Mark::Bold => 1,
            Mark::Italic => 1 << 1,
            Mark::Underline => 1 << 2,
            Mark::Highlight => 1 << 3,
        }
    }

    /// The markup tag this mark serializes to.
    pub fn tag(self) -> &'static str {
        match self {
            Mark::Bold => "strong",
            Mark::Italic => "em",
            Mark::Underline => "u",
            Mark::Highlight => "mark",
        }
    }

    /// Decode the editor's JSON mark form. Unknown marks yield `None`.
    ///
    /// Underline travels as a `textStyle` decoration rather than a bare mark,
    /// since `textStyle` also carries unrelated styling (font size, family).
    fn from_raw(raw: &RawMark) -> Option<Mark> {
        match raw.kind.as_str() {
            "bold" | "strong" => Some(Mark::Bold),
            "italic" | "em" => Some(Mark::Italic),
            "underline" => Some(Mark::Underline),
            "highlight" | "aiHighlight" => Some(Mark::Highlight),
            "textStyle" => {
                let decoration = raw.attrs.as_ref()?.get("textDecoration")?.as_str()?;
                decoration.contains("underline").then_some(Mark::Underline)
            }
            _ => None,
        }
    }

    fn to_raw(self) -> RawMark {
        match self {
            Mark::Bold => RawMark::bare("bold"),
            Mark::Italic => RawMark::bare("italic"),
            Mark::Highlight => RawMark::bare("highlight"),
            Mark::Underline => {
                let mut attrs = Map::new();
                attrs.insert("textDecoration".into(), Value::from("underline"));
                RawMark {
                    kind: "textStyle".into(),
                    attrs: Some(attrs),
                }
            }
        }
    }
}

/// JSON shape of a mark as exchanged with the editor.
#[derive(Debug, Serialize, Deserialize)]
struct RawMark {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Map<String, Value>>,
}

impl RawMark {
    fn bare(kind: &str) -> Self {
        Self {
            kind: kind.into(),
            attrs: None,
        }
    }
}

/// An unordered set of marks. Inserting a mark twice is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkSet(u8);

impl MarkSet {
    pub const EMPTY: MarkSet = MarkSet(0);

    /// Build a set from any sequence of marks.
    pub fn of(marks: &[Mark]) -> Self {
        marks.iter().fold(Self::EMPTY, |set, &m| set.with(m))
    }

    /// Return a copy with `mark` added.
    pub fn with(self, mark: Mark) -> Self {
        MarkSet(self.0 | mark.bit())
    }

    pub fn insert(&mut self, mark: Mark) {
        self.0 |= mark.bit();
    }

    pub fn contains(self, mark: Mark) -> bool {
        self.0 & mark.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate marks in canonical order (bold, italic, underline, highlight).
    pub fn iter(self) -> impl Iterator<Item = Mark> {
        Mark::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl Serialize for MarkSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for mark in self.iter() {
            seq.serialize_element(&mark.to_raw())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for MarkSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Vec<RawMark>>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw
            .iter()
            .filter_map(Mark::from_raw)
            .fold(MarkSet::EMPTY, MarkSet::with))
    }
}

/// A span of text sharing one mark set.
///
/// Serializes as the editor's inline node: `{"type":"text","text":..,"marks":[..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub marks: MarkSet,
}

impl Run {
    /// An unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: MarkSet::EMPTY,
        }
    }

    pub fn marked(text: impl Into<String>, marks: MarkSet) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }
}

impl Serialize for Run {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.marks.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("Run", fields)?;
        state.serialize_field("type", "text")?;
        state.serialize_field("text", &self.text)?;
        if !self.marks.is_empty() {
            state.serialize_field("marks", &self.marks)?;
        }
        state.end()
    }
}

/// One item of an inline sequence as seen by the markup serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(Run),
    /// Entry title: always rendered emphasized regardless of its own marks.
    Title(Vec<Run>),
}

/// Concatenate the text of a run sequence.
pub fn runs_text(runs: &[Run]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Merge adjacent runs with identical marks and drop empty runs.
pub fn normalize_runs(runs: Vec<Run>) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        if run.text.is_empty() {
            continue;
        }
        match out.last_mut() {
            Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
            _ => out.push(run),
        }
    }
    out
}
