//! Résumé sections and section-kind dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::{EducationEntry, ExperienceEntry, HighlightEntry};
use super::rich::RichText;
use crate::error::Error;

/// What a section's entries look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Skills,
    Education,
    Work,
    Research,
    Project,
    Leadership,
}

impl SectionKind {
    /// Title keywords, in the order they are tried.
    const KEYWORDS: [(&'static str, SectionKind); 6] = [
        ("skills", SectionKind::Skills),
        ("education", SectionKind::Education),
        ("project", SectionKind::Project),
        ("leadership", SectionKind::Leadership),
        ("work", SectionKind::Work),
        ("research", SectionKind::Research),
    ];

    /// Infer a kind from free-text title. The first keyword found wins.
    ///
    /// ```
    /// use vitae::record::SectionKind;
    ///
    /// assert_eq!(SectionKind::detect("Technical Skills"), Some(SectionKind::Skills));
    /// assert_eq!(SectionKind::detect("Work & Research"), Some(SectionKind::Work));
    /// assert_eq!(SectionKind::detect("Awards"), None);
    /// ```
    pub fn detect(title: &str) -> Option<SectionKind> {
        let lower = title.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, kind)| *kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            SectionKind::Skills => "skills",
            SectionKind::Education => "education",
            SectionKind::Work => "work",
            SectionKind::Research => "research",
            SectionKind::Project => "project",
            SectionKind::Leadership => "leadership",
        }
    }

    pub fn from_name(name: &str) -> Option<SectionKind> {
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == name)
            .map(|(_, kind)| *kind)
    }
}

/// Section body, shaped by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionEntries {
    Skills(Vec<String>),
    Education(Vec<EducationEntry>),
    /// Work or research entries.
    Experience(Vec<ExperienceEntry>),
    /// Project or leadership entries.
    Highlights(Vec<HighlightEntry>),
    /// Entries of a section whose kind could not be determined, kept verbatim.
    Unrecognized(Vec<Value>),
}

impl SectionEntries {
    pub fn len(&self) -> usize {
        match self {
            SectionEntries::Skills(v) => v.len(),
            SectionEntries::Education(v) => v.len(),
            SectionEntries::Experience(v) => v.len(),
            SectionEntries::Highlights(v) => v.len(),
            SectionEntries::Unrecognized(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty entries of the shape `kind` expects.
    pub fn empty_for(kind: Option<SectionKind>) -> Self {
        match kind {
            Some(SectionKind::Skills) => SectionEntries::Skills(Vec::new()),
            Some(SectionKind::Education) => SectionEntries::Education(Vec::new()),
            Some(SectionKind::Work | SectionKind::Research) => {
                SectionEntries::Experience(Vec::new())
            }
            Some(SectionKind::Project | SectionKind::Leadership) => {
                SectionEntries::Highlights(Vec::new())
            }
            None => SectionEntries::Unrecognized(Vec::new()),
        }
    }
}

/// One titled section of a résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection", into = "RawSection")]
pub struct Section {
    pub title: RichText,
    /// Explicit kind tag. Sections without one dispatch on their title.
    pub kind: Option<SectionKind>,
    pub entries: SectionEntries,
}

impl Section {
    /// The kind this section dispatches on: the explicit tag, else the title.
    pub fn resolved_kind(&self) -> Option<SectionKind> {
        self.kind.or_else(|| SectionKind::detect(&self.title.plain_text()))
    }
}

/// JSON shape of a section.
#[derive(Debug, Serialize, Deserialize)]
struct RawSection {
    #[serde(default)]
    title: RichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<SectionKind>,
    #[serde(default)]
    entries: Option<Vec<Value>>,
}

impl TryFrom<RawSection> for Section {
    type Error = Error;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        let kind = raw
            .kind
            .or_else(|| SectionKind::detect(&raw.title.plain_text()));
        let values = raw.entries.unwrap_or_default();

        let entries = match kind {
            Some(SectionKind::Skills) => SectionEntries::Skills(
                values
                    .into_iter()
                    .map(|v| match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Some(SectionKind::Education) => SectionEntries::Education(typed(&raw.title, values)?),
            Some(SectionKind::Work | SectionKind::Research) => {
                SectionEntries::Experience(typed(&raw.title, values)?)
            }
            Some(SectionKind::Project | SectionKind::Leadership) => {
                SectionEntries::Highlights(typed(&raw.title, values)?)
            }
            None => SectionEntries::Unrecognized(values),
        };

        Ok(Section {
            title: raw.title,
            kind: raw.kind,
            entries,
        })
    }
}

fn typed<T: serde::de::DeserializeOwned>(title: &RichText, values: Vec<Value>) -> Result<Vec<T>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            serde_json::from_value(v).map_err(|e| {
                Error::InvalidRecord(format!("section `{}` entry {i}: {e}", title.plain_text()))
            })
        })
        .collect()
}

fn to_values<T: Serialize>(entries: Vec<T>) -> Vec<Value> {
    entries
        .into_iter()
        .filter_map(|e| serde_json::to_value(e).ok())
        .collect()
}

impl From<Section> for RawSection {
    fn from(section: Section) -> Self {
        let entries = match section.entries {
            SectionEntries::Skills(v) => v.into_iter().map(Value::String).collect(),
            SectionEntries::Education(v) => to_values(v),
            SectionEntries::Experience(v) => to_values(v),
            SectionEntries::Highlights(v) => to_values(v),
            SectionEntries::Unrecognized(v) => v,
        };
        RawSection {
            title: section.title,
            kind: section.kind,
            entries: Some(entries),
        }
    }
}
