//! Typed section entries.

use serde::{Deserialize, Serialize};

use super::rich::RichText;

/// One school with its degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(alias = "institution")]
    pub school: RichText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<RichText>,
    pub degrees: Vec<Degree>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Degree {
    pub degree_type: RichText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpa: Option<RichText>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<RichText>,
}

/// One employer or lab, holding one or more positions.
///
/// Also reads the older flat shape, where a single position's fields sit on
/// the entry itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawExperienceEntry")]
pub struct ExperienceEntry {
    pub company: RichText,
    pub positions: Vec<Position>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawExperienceEntry {
    #[serde(alias = "institution")]
    company: RichText,
    positions: Vec<Position>,
    title: Option<RichText>,
    description: Option<RichText>,
    location: Option<RichText>,
    dates: Option<RichText>,
    bullets: Vec<RichText>,
}

impl From<RawExperienceEntry> for ExperienceEntry {
    fn from(raw: RawExperienceEntry) -> Self {
        let inline = Position {
            title: raw.title,
            description: raw.description,
            location: raw.location,
            dates: raw.dates,
            bullets: raw.bullets,
        };
        let mut positions = raw.positions;
        if inline != Position::default() {
            if !positions.is_empty() {
                tracing::warn!(
                    company = %raw.company.plain_text(),
                    "entry has inline position fields and a positions list, keeping both"
                );
            }
            positions.insert(0, inline);
        }
        ExperienceEntry {
            company: raw.company,
            positions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<RichText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<RichText>,
    pub bullets: Vec<RichText>,
}

/// A one-line project or leadership entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightEntry {
    pub title: RichText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<RichText>,
    /// Technologies used (projects only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}
