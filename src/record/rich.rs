//! Rich-text field values.

use serde::{Deserialize, Serialize};

use crate::markup::{parse_html, parse_markup};
use crate::model::{Run, normalize_runs, runs_text};

/// A record field holding either a markup string or a run sequence.
///
/// Stored records mostly carry plain strings; records extracted from an
/// edited tree carry runs wherever formatting survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RichText {
    Markup(String),
    Runs(Vec<Run>),
}

impl Default for RichText {
    fn default() -> Self {
        RichText::Markup(String::new())
    }
}

impl RichText {
    /// Collapse runs to the simplest equivalent value.
    ///
    /// Unformatted text without markup-significant characters becomes a
    /// plain string; anything else stays a run sequence.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        let runs = normalize_runs(runs);
        let plain = runs.iter().all(|r| r.marks.is_empty())
            && !runs.iter().any(|r| r.text.contains(['<', '&']));
        if plain {
            RichText::Markup(runs_text(&runs))
        } else {
            RichText::Runs(runs)
        }
    }

    /// Decoded runs.
    pub fn runs(&self) -> Vec<Run> {
        parse_markup(self)
    }

    /// Text content with all formatting dropped.
    pub fn plain_text(&self) -> String {
        match self {
            RichText::Markup(s) if !s.contains(['<', '&']) => s.clone(),
            RichText::Markup(s) => runs_text(&parse_html(s)),
            RichText::Runs(runs) => runs_text(runs),
        }
    }

    /// Whether the text content is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

impl From<&str> for RichText {
    fn from(s: &str) -> Self {
        RichText::Markup(s.to_string())
    }
}

impl From<String> for RichText {
    fn from(s: String) -> Self {
        RichText::Markup(s)
    }
}

impl From<Vec<Run>> for RichText {
    fn from(runs: Vec<Run>) -> Self {
        RichText::Runs(runs)
    }
}
